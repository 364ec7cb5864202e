mod handler;

pub mod site_free;

pub use handler::handle_site_command;
