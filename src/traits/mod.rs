pub mod observer;
pub mod strategies;

pub use observer::{Observer, ObserverContext};
pub use strategies::{Builder, TagDeclarator, TaskFactory};
