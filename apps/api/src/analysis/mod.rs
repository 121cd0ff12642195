// Resume analysis: prompt construction, model-reply coercion, and the
// upload pipeline that ties extraction to the LLM gateway.
// All LLM calls go through llm_client via the LlmGateway trait.

pub mod coercion;
pub mod handlers;
pub mod pipeline;
pub mod prompts;
