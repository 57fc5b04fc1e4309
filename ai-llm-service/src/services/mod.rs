pub(crate) mod gemini_payloads;
pub mod gemini_service;
