pub mod config;
pub mod directive;
pub mod generator;
pub mod render;

pub use config::Settings;
pub use directive::{Directive, ParseWarning, ProxyDirective, StreamDirective};
pub use generator::Generator;
