//! Model provider adapters implementing the
//! [`LlmGateway`](assistant_application::LlmGateway) port.

pub mod openai;

pub use openai::OpenAiGateway;
