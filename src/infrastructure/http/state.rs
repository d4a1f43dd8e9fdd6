//! Application State
//!
//! 包含所有 Command/Query Handlers 的应用状态

use std::sync::Arc;

use crate::application::{
    // Command handlers
    AdvanceStepHandler, BatchTryOnHandler, CompareQuotesHandler, FailWorkflowHandler,
    GenerateQuoteHandler, InvokeEdgeFunctionHandler, StartWorkflowHandler,
    TransitionWorkflowHandler,
    // Query handlers
    GetBatchSessionsHandler, GetQuoteHandler, GetTryOnSessionHandler, GetWorkflowHandler,
    ListUserWorkflowsHandler,
    // Ports
    EdgeFunctionPort, EventPublisherPort, QueryCachePort, QuoteRepositoryPort,
    TryOnSessionRepositoryPort, WorkflowRepositoryPort, WorkflowStore,
};
use crate::infrastructure::events::EventPublisher;

/// 应用状态
pub struct AppState {
    // ========== Ports ==========
    pub gateway: Arc<dyn EdgeFunctionPort>,
    pub query_cache: Arc<dyn QueryCachePort>,
    pub event_publisher: Arc<EventPublisher>,

    // ========== Command Handlers ==========
    pub generate_quote_handler: GenerateQuoteHandler,
    pub compare_quotes_handler: CompareQuotesHandler,
    pub start_workflow_handler: StartWorkflowHandler,
    pub advance_step_handler: AdvanceStepHandler,
    pub transition_workflow_handler: TransitionWorkflowHandler,
    pub fail_workflow_handler: FailWorkflowHandler,
    pub batch_tryon_handler: Arc<BatchTryOnHandler>,
    pub invoke_edge_handler: InvokeEdgeFunctionHandler,

    // ========== Query Handlers ==========
    pub get_quote_handler: GetQuoteHandler,
    pub get_workflow_handler: GetWorkflowHandler,
    pub list_workflows_handler: ListUserWorkflowsHandler,
    pub get_tryon_session_handler: GetTryOnSessionHandler,
    pub get_batch_sessions_handler: GetBatchSessionsHandler,
}

impl AppState {
    /// 创建应用状态
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        workflow_repo: Arc<dyn WorkflowRepositoryPort>,
        quote_repo: Arc<dyn QuoteRepositoryPort>,
        session_repo: Arc<dyn TryOnSessionRepositoryPort>,
        gateway: Arc<dyn EdgeFunctionPort>,
        query_cache: Arc<dyn QueryCachePort>,
        event_publisher: Arc<EventPublisher>,
        secs_per_item: u64,
    ) -> Self {
        let events: Arc<dyn EventPublisherPort> = event_publisher.clone();
        let store = WorkflowStore::new(workflow_repo, query_cache.clone()).arc();

        Self {
            // Ports
            gateway: gateway.clone(),
            query_cache,
            event_publisher,

            // Command handlers
            generate_quote_handler: GenerateQuoteHandler::new(quote_repo.clone(), events.clone()),
            compare_quotes_handler: CompareQuotesHandler::new(quote_repo.clone()),
            start_workflow_handler: StartWorkflowHandler::new(store.clone(), events.clone()),
            advance_step_handler: AdvanceStepHandler::new(store.clone(), events.clone()),
            transition_workflow_handler: TransitionWorkflowHandler::new(
                store.clone(),
                events.clone(),
            ),
            fail_workflow_handler: FailWorkflowHandler::new(store.clone(), events.clone()),
            batch_tryon_handler: Arc::new(
                BatchTryOnHandler::new(session_repo.clone(), gateway.clone(), events)
                    .with_secs_per_item(secs_per_item),
            ),
            invoke_edge_handler: InvokeEdgeFunctionHandler::new(gateway),

            // Query handlers
            get_quote_handler: GetQuoteHandler::new(quote_repo),
            get_workflow_handler: GetWorkflowHandler::new(store.clone()),
            list_workflows_handler: ListUserWorkflowsHandler::new(store),
            get_tryon_session_handler: GetTryOnSessionHandler::new(session_repo.clone()),
            get_batch_sessions_handler: GetBatchSessionsHandler::new(session_repo),
        }
    }
}
