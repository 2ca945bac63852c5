mod engine_properties;
mod workspace_batch;
