pub mod routes;
pub mod startup;
pub mod errors;
pub mod observability;
pub mod process;

pub use process::launch;
pub use startup::run;
