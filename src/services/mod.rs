pub(crate) mod execution;
pub(crate) mod llm_client;
