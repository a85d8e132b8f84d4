mod builder;
mod document;
mod loader;
mod markdown;
mod output;
mod paths;
mod pipeline;
mod render;
mod source;

pub use builder::Builder;
pub use paths::base_path_from_config;
