pub mod config_ops;
pub mod korean_ops;
pub mod suggest_ops;
