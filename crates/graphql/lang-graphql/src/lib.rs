pub mod ast;
pub mod http;
pub mod schema;
