pub mod binance;
pub mod loader;
pub mod provider;
pub mod validator;
