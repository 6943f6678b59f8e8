//! Run Turn use case.
//!
//! Drives one conversation turn: stream the model's answer, pick up the tool
//! calls it requests, validate and dispatch them, feed the results back and
//! resume the model until it answers in plain text.
//!
//! ```text
//! Streaming ──(tool calls)──► ToolPending ──► ToolExecuting ──► Streaming
//!     │                                                             │
//!     └──(text only)──► Finalized          any failure ──► Failed ◄─┘
//! ```
//!
//! A turn runs as one spawned task and writes [`StreamEvent`]s into a bounded
//! channel. It stops as soon as the receiving side is dropped, the
//! [`CancellationToken`] fires or [`TurnPolicy::max_duration`] elapses.
//!
//! Remote operations are spawned separately so a result that arrives after
//! the turn was abandoned still reaches the transcript as `tool_result_late`.

use crate::config::TurnPolicy;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::llm_gateway::{ChatRequest, GatewayError, LlmGateway};
use crate::ports::tool_executor::RemoteResult;
use crate::tools::{DeclaredTools, ToolRegistry};
use assistant_domain::{
    AssistantPrompt, ClientConfigurations, Conversation, DefaultToolValidator, DomainError,
    ErrorKind, LlmStreamEvent, Message, Model, StopReason, StreamEvent, ToolCall,
    ToolCallAccumulator, ToolError, ToolInvocationResult, ToolValidator, TurnState,
};
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that prevent a turn from starting.
///
/// Once a turn is running, failures are reported as [`StreamEvent::Error`].
#[derive(Error, Debug)]
pub enum RunTurnError {
    #[error("Invalid conversation: {0}")]
    InvalidConversation(#[from] DomainError),
}

/// Input for the [`RunTurnUseCase`].
#[derive(Debug, Clone)]
pub struct RunTurnInput {
    /// History supplied by the client, oldest first.
    pub messages: Vec<Message>,
    /// Credentials for this turn, keyed by product.
    pub configurations: ClientConfigurations,
}

impl RunTurnInput {
    pub fn new(messages: Vec<Message>, configurations: ClientConfigurations) -> Self {
        Self {
            messages,
            configurations,
        }
    }
}

/// Final state of a turn.
#[derive(Debug)]
pub struct TurnOutcome {
    pub turn_id: String,
    pub state: TurnState,
    /// Tool rounds started
    pub rounds: usize,
    pub conversation: Conversation,
}

/// A running turn.
pub struct TurnHandle {
    pub turn_id: String,
    /// Ordered events; the channel closes after `Done` or `Error`.
    pub events: mpsc::Receiver<StreamEvent>,
    pub task: JoinHandle<TurnOutcome>,
}

/// Why a turn stopped early
#[derive(Debug)]
enum TurnFailure {
    Protocol(String),
    Upstream(String),
    RoundLimit(usize),
    Timeout(Duration),
    Cancelled,
    Disconnected,
}

impl TurnFailure {
    fn detail(&self) -> String {
        match self {
            TurnFailure::Protocol(detail) | TurnFailure::Upstream(detail) => detail.clone(),
            TurnFailure::RoundLimit(max) => {
                format!("round limit exceeded: more than {} tool rounds", max)
            }
            TurnFailure::Timeout(limit) => {
                format!("turn exceeded the {}s time limit", limit.as_secs())
            }
            TurnFailure::Cancelled => "turn cancelled".to_string(),
            TurnFailure::Disconnected => "client disconnected".to_string(),
        }
    }

    /// Terminal event for the client, if anyone is still listening
    fn event(&self) -> Option<StreamEvent> {
        let kind = match self {
            TurnFailure::Protocol(_) => ErrorKind::StreamProtocol,
            TurnFailure::Upstream(_) => ErrorKind::Upstream,
            TurnFailure::RoundLimit(_) => ErrorKind::RoundLimit,
            TurnFailure::Timeout(_) => ErrorKind::Timeout,
            TurnFailure::Cancelled => ErrorKind::Cancelled,
            TurnFailure::Disconnected => return None,
        };
        Some(StreamEvent::error(kind, self.detail()))
    }
}

impl From<GatewayError> for TurnFailure {
    fn from(e: GatewayError) -> Self {
        if e.is_protocol() {
            TurnFailure::Protocol(e.to_string())
        } else {
            TurnFailure::Upstream(e.to_string())
        }
    }
}

impl From<DomainError> for TurnFailure {
    fn from(e: DomainError) -> Self {
        TurnFailure::Protocol(e.to_string())
    }
}

/// State owned by one turn
struct TurnContext {
    turn_id: String,
    conversation: Conversation,
    configurations: ClientConfigurations,
    declared: DeclaredTools,
    system: String,
    state: TurnState,
    rounds: usize,
}

/// A call that has either been answered locally or handed to a remote task
enum PendingResult {
    Ready(ToolInvocationResult),
    Dispatched {
        call_id: String,
        tool_name: String,
        receiver: oneshot::Receiver<ToolInvocationResult>,
    },
}

impl PendingResult {
    async fn into_result(self) -> ToolInvocationResult {
        match self {
            PendingResult::Ready(result) => result,
            PendingResult::Dispatched {
                call_id,
                tool_name,
                receiver,
            } => receiver.await.unwrap_or_else(|_| {
                ToolInvocationResult::failure(
                    call_id,
                    tool_name,
                    ToolError::execution_failed(
                        "remote operation stopped before reporting a result",
                    ),
                )
            }),
        }
    }
}

/// Use case for running one conversation turn.
#[derive(Clone)]
pub struct RunTurnUseCase {
    gateway: Arc<dyn LlmGateway>,
    registry: Arc<ToolRegistry>,
    validator: Arc<dyn ToolValidator>,
    policy: TurnPolicy,
    model: Model,
    temperature: Option<f32>,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl RunTurnUseCase {
    pub fn new(gateway: Arc<dyn LlmGateway>, registry: Arc<ToolRegistry>) -> Self {
        Self {
            gateway,
            registry,
            validator: Arc::new(DefaultToolValidator),
            policy: TurnPolicy::default(),
            model: Model::default(),
            temperature: None,
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_policy(mut self, policy: TurnPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_model(mut self, model: Model) -> Self {
        self.model = model;
        self
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_validator(mut self, validator: Arc<dyn ToolValidator>) -> Self {
        self.validator = validator;
        self
    }

    /// Create with a conversation logger.
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn policy(&self) -> &TurnPolicy {
        &self.policy
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Validate the input and spawn the turn.
    pub fn start(
        &self,
        input: RunTurnInput,
        cancel: CancellationToken,
    ) -> Result<TurnHandle, RunTurnError> {
        let conversation = Conversation::from_history(input.messages)?;
        let turn_id = uuid::Uuid::new_v4().to_string();
        let (tx, rx) = mpsc::channel(self.policy.event_buffer.max(1));

        let this = self.clone();
        let id = turn_id.clone();
        let configurations = input.configurations;
        let task = tokio::spawn(async move {
            this.execute(id, conversation, configurations, tx, cancel)
                .await
        });

        Ok(TurnHandle {
            turn_id,
            events: rx,
            task,
        })
    }

    /// Run a turn to completion, writing its events into `events`.
    pub async fn execute(
        &self,
        turn_id: String,
        conversation: Conversation,
        configurations: ClientConfigurations,
        events: mpsc::Sender<StreamEvent>,
        cancel: CancellationToken,
    ) -> TurnOutcome {
        let products = configurations.products();
        let declared = self.registry.declarations_for(&products);

        info!(
            turn_id = %turn_id,
            model = %self.model,
            tools = declared.len(),
            "Starting turn"
        );
        self.conversation_logger.log(ConversationEvent::new(
            "turn_started",
            json!({
                "turn_id": turn_id,
                "model": self.model.to_string(),
                "products": products.iter().map(|p| p.as_str()).collect::<Vec<_>>(),
                "tools": declared.names(),
                "messages": conversation.messages(),
            }),
        ));

        let mut ctx = TurnContext {
            system: AssistantPrompt::system(&products),
            turn_id,
            conversation,
            configurations,
            declared,
            state: TurnState::Streaming,
            rounds: 0,
        };

        let max_duration = self.policy.max_duration;
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(TurnFailure::Cancelled),
            _ = events.closed() => Err(TurnFailure::Disconnected),
            run = tokio::time::timeout(max_duration, self.run_loop(&mut ctx, &events, &cancel)) => {
                run.unwrap_or(Err(TurnFailure::Timeout(max_duration)))
            }
        };

        let error = match result {
            Ok(()) => None,
            Err(failure) => {
                ctx.state = TurnState::Failed;
                warn!(
                    turn_id = %ctx.turn_id,
                    round = ctx.rounds,
                    error = %failure.detail(),
                    "Turn failed"
                );
                if let Some(event) = failure.event()
                    && let Err(e) = events.try_send(event)
                {
                    // Listener is gone or not reading; the turn still ends here
                    debug!(turn_id = %ctx.turn_id, error = %e, "Terminal event dropped");
                }
                Some(failure.detail())
            }
        };

        self.conversation_logger.log(ConversationEvent::new(
            "turn_finished",
            json!({
                "turn_id": ctx.turn_id,
                "state": ctx.state.as_str(),
                "rounds": ctx.rounds,
                "error": error,
            }),
        ));

        TurnOutcome {
            turn_id: ctx.turn_id,
            state: ctx.state,
            rounds: ctx.rounds,
            conversation: ctx.conversation,
        }
    }

    async fn run_loop(
        &self,
        ctx: &mut TurnContext,
        events: &mpsc::Sender<StreamEvent>,
        cancel: &CancellationToken,
    ) -> Result<(), TurnFailure> {
        loop {
            check_cancelled(cancel, events)?;

            let request = ChatRequest {
                model: self.model.clone(),
                system: ctx.system.clone(),
                messages: ctx.conversation.messages().to_vec(),
                tools: ctx.declared.declarations(),
                temperature: self.temperature,
            };
            debug!(
                turn_id = %ctx.turn_id,
                round = ctx.rounds,
                messages = request.messages.len(),
                "Requesting model response"
            );
            let mut stream = self.gateway.stream_chat(request).await?;

            let mut text = String::new();
            let mut pending = ToolCallAccumulator::new();
            let mut stop = None;
            while let Some(event) = stream.recv().await {
                match event {
                    LlmStreamEvent::TextDelta(delta) => {
                        if delta.is_empty() {
                            continue;
                        }
                        text.push_str(&delta);
                        emit(events, StreamEvent::text(delta)).await?;
                    }
                    LlmStreamEvent::ToolCallDelta {
                        index,
                        id,
                        name,
                        arguments_delta,
                    } => pending.push(index, id, name, arguments_delta),
                    LlmStreamEvent::Finished(reason) => {
                        stop = Some(reason);
                        break;
                    }
                    LlmStreamEvent::Error(e) => return Err(TurnFailure::Protocol(e)),
                }
            }

            let Some(stop) = stop else {
                return Err(TurnFailure::Protocol(
                    "model stream ended without a finish signal".to_string(),
                ));
            };
            let calls = pending
                .finish()
                .map_err(|e| TurnFailure::Protocol(e.to_string()))?;

            self.conversation_logger.log(ConversationEvent::new(
                "model_response",
                json!({
                    "turn_id": ctx.turn_id,
                    "round": ctx.rounds,
                    "text": text,
                    "tool_calls": calls,
                }),
            ));

            if calls.is_empty() {
                if stop == StopReason::MaxTokens {
                    warn!(turn_id = %ctx.turn_id, "Model response cut off at the token limit");
                }
                ctx.state.transition(TurnState::Finalized)?;
                ctx.conversation.append_assistant_text(text);
                info!(turn_id = %ctx.turn_id, rounds = ctx.rounds, "Turn finalized");
                emit(events, StreamEvent::Done).await?;
                return Ok(());
            }

            ctx.state.transition(TurnState::ToolPending)?;
            ctx.rounds += 1;
            if ctx.rounds > self.policy.max_tool_rounds {
                warn!(
                    turn_id = %ctx.turn_id,
                    max = self.policy.max_tool_rounds,
                    "Turn exceeded max_tool_rounds"
                );
                return Err(TurnFailure::RoundLimit(self.policy.max_tool_rounds));
            }
            ensure_unique_calls(&ctx.conversation, &calls)?;

            ctx.state.transition(TurnState::ToolExecuting)?;
            let results = self.execute_round(ctx, &calls, events, cancel).await?;

            ctx.conversation.commit_tool_round(text, calls, &results)?;
            ctx.state.transition(TurnState::Streaming)?;
        }
    }

    /// Resolve, validate and dispatch every call of one round, then collect
    /// the results in request order.
    async fn execute_round(
        &self,
        ctx: &TurnContext,
        calls: &[ToolCall],
        events: &mpsc::Sender<StreamEvent>,
        cancel: &CancellationToken,
    ) -> Result<Vec<ToolInvocationResult>, TurnFailure> {
        let mut pending = Vec::with_capacity(calls.len());
        for call in calls {
            let args = call.display_arguments();
            emit(
                events,
                StreamEvent::ToolCallStart {
                    call_id: call.call_id.clone(),
                    tool_name: call.tool_name.clone(),
                    args: args.clone(),
                },
            )
            .await?;
            self.conversation_logger.log(ConversationEvent::new(
                "tool_call",
                json!({
                    "turn_id": ctx.turn_id,
                    "round": ctx.rounds,
                    "call_id": call.call_id,
                    "tool": call.tool_name,
                    "arguments": args,
                }),
            ));

            pending.push(self.prepare_call(ctx, call, events, cancel)?);
        }

        let results: Vec<ToolInvocationResult> =
            futures::future::join_all(pending.into_iter().map(PendingResult::into_result)).await;

        for result in &results {
            match &result.error {
                None => debug!(
                    turn_id = %ctx.turn_id,
                    tool = %result.tool_name,
                    call_id = %result.call_id,
                    "Tool call succeeded"
                ),
                Some(error) => debug!(
                    turn_id = %ctx.turn_id,
                    tool = %result.tool_name,
                    call_id = %result.call_id,
                    error = %error,
                    "Tool call failed"
                ),
            }
            self.conversation_logger.log(ConversationEvent::new(
                "tool_result",
                json!({ "turn_id": ctx.turn_id, "result": result }),
            ));
            emit(
                events,
                StreamEvent::ToolCallResult {
                    result: result.clone(),
                },
            )
            .await?;
        }

        Ok(results)
    }

    /// Answer a call locally when it cannot run, otherwise spawn its remote
    /// operation.
    fn prepare_call(
        &self,
        ctx: &TurnContext,
        call: &ToolCall,
        events: &mpsc::Sender<StreamEvent>,
        cancel: &CancellationToken,
    ) -> Result<PendingResult, TurnFailure> {
        let reject = |error: ToolError| {
            PendingResult::Ready(ToolInvocationResult::failure(
                call.call_id.clone(),
                call.tool_name.clone(),
                error,
            ))
        };

        let entry = match ctx.declared.resolve(&call.tool_name) {
            Ok(entry) => entry,
            Err(e) => {
                debug!(turn_id = %ctx.turn_id, call_id = %call.call_id, "{}", e);
                return Ok(reject(ToolError::not_found(&call.tool_name)));
            }
        };

        let arguments = match self.validator.validate(call, entry.declaration()) {
            Ok(arguments) => arguments,
            Err(e) => {
                debug!(
                    turn_id = %ctx.turn_id,
                    tool = %call.tool_name,
                    call_id = %call.call_id,
                    error = %e,
                    "Rejected tool arguments"
                );
                return Ok(reject(ToolError::invalid_argument(e.to_string())));
            }
        };

        let Some(configuration) = ctx.configurations.get(entry.bound_product()).cloned() else {
            return Ok(reject(ToolError::not_found(&call.tool_name)));
        };

        check_cancelled(cancel, events)?;
        info!(
            turn_id = %ctx.turn_id,
            tool = %call.tool_name,
            call_id = %call.call_id,
            "Dispatching remote operation"
        );

        let (tx, rx) = oneshot::channel();
        let logger = self.conversation_logger.clone();
        let redactor = ctx.configurations.clone();
        let turn_id = ctx.turn_id.clone();
        let call_id = call.call_id.clone();
        let tool_name = call.tool_name.clone();
        tokio::spawn(async move {
            let outcome = entry.invoke(&arguments, &configuration).await;
            let result = to_invocation_result(&call_id, &tool_name, outcome, &redactor);
            if let Err(result) = tx.send(result) {
                warn!(
                    turn_id = %turn_id,
                    call_id = %result.call_id,
                    "Remote result arrived after the turn ended"
                );
                logger.log(ConversationEvent::new(
                    "tool_result_late",
                    json!({ "turn_id": turn_id, "result": result }),
                ));
            }
        });

        Ok(PendingResult::Dispatched {
            call_id: call.call_id.clone(),
            tool_name: call.tool_name.clone(),
            receiver: rx,
        })
    }
}

fn to_invocation_result(
    call_id: &str,
    tool_name: &str,
    outcome: RemoteResult,
    configurations: &ClientConfigurations,
) -> ToolInvocationResult {
    match outcome {
        RemoteResult::Success(payload) => ToolInvocationResult::success(
            call_id,
            tool_name,
            configurations.redact_value(payload),
        ),
        RemoteResult::Failure(detail) => ToolInvocationResult::failure(
            call_id,
            tool_name,
            ToolError::execution_failed(configurations.redact(&detail)),
        ),
        RemoteResult::TimedOut(detail) => ToolInvocationResult::failure(
            call_id,
            tool_name,
            ToolError::timeout(configurations.redact(&detail)),
        ),
    }
}

/// Call ids must be unique within the round and across the turn.
fn ensure_unique_calls(conversation: &Conversation, calls: &[ToolCall]) -> Result<(), TurnFailure> {
    let mut seen = HashSet::new();
    for call in calls {
        if conversation.has_call(&call.call_id) || !seen.insert(call.call_id.as_str()) {
            return Err(DomainError::DuplicateCallId(call.call_id.clone()).into());
        }
    }
    Ok(())
}

fn check_cancelled(
    cancel: &CancellationToken,
    events: &mpsc::Sender<StreamEvent>,
) -> Result<(), TurnFailure> {
    if cancel.is_cancelled() {
        return Err(TurnFailure::Cancelled);
    }
    if events.is_closed() {
        return Err(TurnFailure::Disconnected);
    }
    Ok(())
}

async fn emit(events: &mpsc::Sender<StreamEvent>, event: StreamEvent) -> Result<(), TurnFailure> {
    events
        .send(event)
        .await
        .map_err(|_| TurnFailure::Disconnected)
}
