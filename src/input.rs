pub mod catalog;
pub mod document;
pub mod project;
pub mod template;
