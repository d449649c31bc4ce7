pub mod comfyui;
pub mod export;
pub mod ollama;
pub mod ports;
pub mod resilient_llm;
