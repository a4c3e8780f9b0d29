pub mod support;

mod gateway_tests;
mod llm_client_tests;
mod normalizer_tests;
