mod result_ext;
pub use result_ext::*;

mod promise;
pub use promise::*;
