//! Request documents in, response documents out.

pub mod dispatcher;
pub mod node;
pub mod request;
pub mod response;

pub use dispatcher::Dispatcher;
pub use node::{NodeExt, RequestError, RequestResult};
pub use request::{decode_settings, GetKind, GetRequest, PostKind, PostRequest};
pub use response::{Response, ResponseBody, RouteItem};
