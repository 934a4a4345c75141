pub mod dispatcher;
pub mod submit;
