//! Edge Function Adapter - 远程 edge function 客户端实现

mod fake_edge_client;
mod http_edge_client;

pub use fake_edge_client::FakeEdgeClient;
pub use http_edge_client::*;
