mod config;
mod convert;
mod dedup;
mod error;
pub mod json;
mod mapper;
mod mapping;
mod pointer;
mod to_value;
mod value;
mod writer;

pub use config::*;
pub use convert::*;
pub use dedup::*;
pub use error::*;
pub use json::{GeneratorConfig, IoSink, JsonGenerator, TextGenerator, TextSink};
pub use mapjson_derive::Mapped;
pub use mapper::*;
pub use mapping::*;
pub use pointer::*;
pub use to_value::*;
pub use value::*;
pub use writer::{DynamicGenerator, MappingGenerator};
