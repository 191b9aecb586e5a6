pub mod confirmation;
pub mod constants;
pub mod environment;
pub mod guidance;
pub mod record;
pub mod submit;
