//! Board creator - drives a [`BoardPlan`] through the creation stages
//!
//! The control flow lives in [`crate::state_machine`]; this module performs
//! the remote work for each stage and interprets the machine's actions.

use reno_client::ApiClient;
use reno_core::fail_open::fail_open;
use reno_core::{
    column_keys, BoardPlan, DomainErrorKind, RenoConfig, RenoError, Result, TaskItem,
};
use reno_planning::{validate_workspace_id, PlanSummary, STANDARD_COLUMNS};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::cancel::CancelHandle;
use crate::progress::{ProgressSink, ProgressTracker};
use crate::queries::{self, op};
use crate::report::{CompletionReport, CreationFailure, ItemFailure, RunStatus};
use crate::state_machine::{transition, Action, Event, Stage, State};

/// Board URL used when the service does not return one
const BOARD_URL_BASE: &str = "https://monday.com/boards";

/// Remote state accumulated during one run
#[derive(Debug, Default)]
struct RunContext {
    board_id: Option<String>,
    board_url: Option<String>,
    /// Logical column key -> remote column id
    column_ids: BTreeMap<String, String>,
    /// Workspace the board goes into; replaced once if the requested one is rejected
    workspace_id: Option<String>,
    workspace_replaced: bool,
    groups_created: Vec<String>,
    items_attempted: usize,
    items_created: usize,
    item_failures: Vec<ItemFailure>,
    warnings: Vec<String>,
}

impl RunContext {
    fn board_id(&self) -> Result<String> {
        self.board_id
            .clone()
            .ok_or_else(|| RenoError::Other("No board has been created yet".to_string()))
    }
}

/// Creates a remote board from a plan
pub struct BoardCreator {
    client: ApiClient,
    config: RenoConfig,
    workspace_id: Option<String>,
    cancel: CancelHandle,
    tracker: ProgressTracker,
}

impl BoardCreator {
    pub fn new(client: ApiClient, config: RenoConfig) -> Self {
        let workspace_id = config.creation.workspace_id.clone();
        Self {
            client,
            config,
            workspace_id,
            cancel: CancelHandle::new(),
            tracker: ProgressTracker::new(),
        }
    }

    /// Create the board inside this workspace instead of the configured one.
    pub fn with_workspace(mut self, workspace_id: impl Into<String>) -> Self {
        self.workspace_id = Some(workspace_id.into());
        self
    }

    pub fn with_cancel(mut self, cancel: CancelHandle) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_sink(mut self, sink: impl ProgressSink + 'static) -> Self {
        self.tracker.add_sink(Box::new(sink));
        self
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Run every stage against `plan`.
    ///
    /// Remote ids are written back into the plan's groups and items as they
    /// are created, so a failed run still shows what exists remotely.
    pub async fn run(
        &mut self,
        plan: &mut BoardPlan,
    ) -> std::result::Result<CompletionReport, CreationFailure> {
        let run_id = Uuid::new_v4();
        let started = Instant::now();
        let mut ctx = RunContext {
            workspace_id: self.workspace_id.clone(),
            ..RunContext::default()
        };
        self.tracker.reset();

        info!(
            %run_id,
            board = %plan.board_name,
            groups = plan.groups.len(),
            items = plan.items.len(),
            "Creating board"
        );

        let mut last_error: Option<RenoError> = None;
        let mut current = Stage::Validating;
        let mut state = self.apply(State::Idle, Event::Start);

        loop {
            match state {
                State::Running { stage } => {
                    current = stage;
                    if self.cancel.is_cancelled() {
                        state = self.apply(state, Event::Cancel);
                        continue;
                    }
                    let event = match self.run_stage(stage, plan, &mut ctx).await {
                        Ok(()) => Event::StageSucceeded,
                        Err(e) => {
                            let message = e.to_string();
                            last_error = Some(e);
                            Event::StageFailed { message }
                        }
                    };
                    state = self.apply(state, event);
                }
                State::Complete => return Ok(self.report(run_id, started, plan, ctx)),
                State::Cancelled { before } => {
                    let source = RenoError::Cancelled(before.to_string());
                    return Err(self.failure(run_id, started, plan, ctx, before, source));
                }
                State::Failed { stage, error } => {
                    let source = last_error.take().unwrap_or(RenoError::Other(error));
                    let stage = stage.unwrap_or(current);
                    return Err(self.failure(run_id, started, plan, ctx, stage, source));
                }
                State::Idle => {
                    let source = RenoError::Other("Board creation never started".to_string());
                    return Err(self.failure(run_id, started, plan, ctx, current, source));
                }
            }
        }
    }

    fn apply(&mut self, state: State, event: Event) -> State {
        let (next, actions) = transition(state, event);
        for action in actions {
            match action {
                Action::LogActivity { message } => info!("{}", message),
                Action::EnterStage { stage } => self.tracker.begin(stage),
                Action::RecordSuccess { stage } => self.tracker.complete(stage),
                Action::RecordFailure { stage, error } => self.tracker.fail(stage, &error),
                Action::Finish => self.tracker.finish(),
            }
        }
        next
    }

    async fn run_stage(
        &mut self,
        stage: Stage,
        plan: &mut BoardPlan,
        ctx: &mut RunContext,
    ) -> Result<()> {
        match stage {
            Stage::Validating => self.preflight(plan, ctx).await,
            Stage::CreatingBoard => self.create_board(plan, ctx).await,
            Stage::CreatingColumns => self.create_columns(ctx).await,
            Stage::CreatingGroups => self.create_groups(plan, ctx).await,
            Stage::CreatingItems => self.create_items(plan, ctx).await,
            Stage::Verifying => self.verify(plan, ctx).await,
            Stage::Done => Ok(()),
        }
    }

    /// Plan shape, credential and workspace checks. Nothing exists remotely
    /// if this fails. A workspace that cannot be found is swapped for the
    /// first accessible one.
    async fn preflight(&self, plan: &BoardPlan, ctx: &mut RunContext) -> Result<()> {
        plan.validate()?;

        let data = self.client.execute(op::ME, queries::ME, json!({})).await?;
        let user = data
            .get("me")
            .filter(|me| !me.is_null())
            .ok_or_else(|| RenoError::Auth("API token was not accepted".to_string()))?;
        debug!(user = user["name"].as_str().unwrap_or("unknown"), "API connection verified");

        if let Some(workspace_id) = ctx.workspace_id.clone() {
            let workspace_id = validate_workspace_id(&workspace_id)?;
            let lookup = self
                .client
                .execute(
                    op::WORKSPACES,
                    queries::WORKSPACES,
                    json!({ "ids": [workspace_id] }),
                )
                .await;
            let found = match lookup {
                Ok(data) => !workspaces_of(&data).is_empty(),
                Err(e) if is_invalid_reference(&e) => false,
                Err(e) => return Err(e),
            };
            if !found {
                self.replace_workspace(&workspace_id, ctx).await?;
            }
        }

        Ok(())
    }

    /// Point the run at the first workspace the token can see. Happens at
    /// most once per run and is reported as a warning.
    async fn replace_workspace(&self, rejected: &str, ctx: &mut RunContext) -> Result<()> {
        let unavailable = |reason: String| {
            RenoError::Validation(format!(
                "Workspace '{}' was not found or is not accessible, and {}",
                rejected, reason
            ))
        };

        let data = self
            .client
            .execute(op::WORKSPACES, queries::WORKSPACES, json!({}))
            .await
            .map_err(|e| unavailable(format!("listing workspaces failed: {}", e)))?;
        let (id, name) = workspaces_of(&data)
            .iter()
            .find_map(|ws| Some((id_of(ws)?, ws["name"].as_str().unwrap_or("").to_string())))
            .ok_or_else(|| unavailable("no other workspace is available".to_string()))?;

        warn!(rejected, fallback = %id, "Using fallback workspace");
        ctx.warnings.push(format!(
            "Workspace '{}' is not accessible; the board was created in workspace '{}' ({})",
            rejected, name, id
        ));
        ctx.workspace_id = Some(id);
        ctx.workspace_replaced = true;
        Ok(())
    }

    /// A rejected workspace id is replaced once and the board retried there.
    async fn create_board(&self, plan: &BoardPlan, ctx: &mut RunContext) -> Result<()> {
        let first = self.send_create_board(plan, ctx).await;
        let data = match first {
            Err(e) if is_invalid_reference(&e) && !ctx.workspace_replaced => {
                let Some(rejected) = ctx.workspace_id.clone() else {
                    return Err(e);
                };
                warn!(workspace = %rejected, error = %e, "Board creation rejected the workspace");
                self.replace_workspace(&rejected, ctx).await?;
                self.send_create_board(plan, ctx).await?
            }
            outcome => outcome?,
        };

        let board = &data["create_board"];
        let board_id = id_of(board)
            .ok_or_else(|| RenoError::Other("create_board returned no board id".to_string()))?;
        let board_url = board["url"]
            .as_str()
            .filter(|url| !url.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("{}/{}", BOARD_URL_BASE, board_id));

        info!(board_id = %board_id, url = %board_url, "Board created");
        ctx.board_id = Some(board_id);
        ctx.board_url = Some(board_url);
        Ok(())
    }

    async fn send_create_board(&self, plan: &BoardPlan, ctx: &RunContext) -> Result<Value> {
        let mut variables = json!({
            "board_name": plan.board_name,
            "board_kind": self.config.creation.board_kind,
        });
        if let Some(workspace_id) = &ctx.workspace_id {
            variables["workspace_id"] = json!(workspace_id);
        }
        self.client
            .execute(op::CREATE_BOARD, queries::CREATE_BOARD, variables)
            .await
    }

    /// Best effort: a column that cannot be created becomes a warning and
    /// its values keep the logical key.
    async fn create_columns(&self, ctx: &mut RunContext) -> Result<()> {
        let board_id = ctx.board_id()?;

        for column in STANDARD_COLUMNS {
            let variables = json!({
                "board_id": board_id,
                "title": column.title,
                "column_type": column.column_type,
                "description": column.description,
            });
            let name = format!("create_column '{}'", column.title);
            let created = fail_open(&name, || async move {
                let data = self
                    .client
                    .execute(op::CREATE_COLUMN, queries::CREATE_COLUMN, variables)
                    .await?;
                id_of(&data["create_column"]).ok_or_else(|| {
                    RenoError::Other("create_column returned no column id".to_string())
                })
            })
            .await;

            match created {
                Some(remote_id) => {
                    debug!(key = column.key, remote_id = %remote_id, "Column created");
                    ctx.column_ids.insert(column.key.to_string(), remote_id);
                }
                None => ctx.warnings.push(format!(
                    "Column '{}' could not be created; values are sent under '{}'",
                    column.title, column.key
                )),
            }
        }

        if ctx.column_ids.is_empty() {
            warn!("No standard columns were created");
        }
        Ok(())
    }

    /// Groups are created in plan order, each placed after the previous one.
    async fn create_groups(&self, plan: &mut BoardPlan, ctx: &mut RunContext) -> Result<()> {
        let board_id = ctx.board_id()?;
        let mut previous: Option<String> = None;

        for group in plan.groups.iter_mut() {
            let mut variables = json!({
                "board_id": board_id,
                "group_name": group.title,
            });
            if let Some(previous_id) = &previous {
                variables["relative_to"] = json!(previous_id);
                variables["position_relative_method"] = json!("after_at");
            }

            let data = self
                .client
                .execute(op::CREATE_GROUP, queries::CREATE_GROUP, variables)
                .await?;
            let group_id = id_of(&data["create_group"]).ok_or_else(|| {
                RenoError::Other(format!("create_group returned no id for '{}'", group.title))
            })?;

            debug!(group = %group.title, group_id = %group_id, "Group created");
            group.remote_id = Some(group_id.clone());
            ctx.groups_created.push(group.title.clone());
            previous = Some(group_id);
        }

        info!(groups = ctx.groups_created.len(), "Groups created");
        Ok(())
    }

    /// Per-item failures are collected, not escalated.
    async fn create_items(&mut self, plan: &mut BoardPlan, ctx: &mut RunContext) -> Result<()> {
        let board_id = ctx.board_id()?;
        let batch_size = self.config.creation.batch_size.max(1);
        let pause = self.config.creation.batch_pause();
        let total = plan.items.len();
        let mut batches_sent = 0usize;

        for g in 0..plan.groups.len() {
            let title = plan.groups[g].title.clone();
            let indices: Vec<usize> = plan
                .items
                .iter()
                .enumerate()
                .filter(|(_, item)| item.group_title == title)
                .map(|(idx, _)| idx)
                .collect();
            if indices.is_empty() {
                continue;
            }
            let group_id = plan.groups[g].remote_id.clone().ok_or_else(|| {
                RenoError::Other(format!("Group '{}' has no remote id", title))
            })?;

            info!(group = %title, items = indices.len(), "Creating items");
            let mut group_failures = 0usize;

            for batch in indices.chunks(batch_size) {
                if batches_sent > 0 && !pause.is_zero() {
                    tokio::time::sleep(pause).await;
                }
                batches_sent += 1;

                for &idx in batch {
                    ctx.items_attempted += 1;
                    let result = self
                        .create_item(&board_id, &group_id, &plan.items[idx], ctx)
                        .await;
                    match result {
                        Ok(item_id) => {
                            plan.items[idx].remote_id = Some(item_id);
                            ctx.items_created += 1;
                        }
                        Err(e) => {
                            let item = &plan.items[idx];
                            warn!(item = %item.name, group = %title, "Item creation failed: {}", e);
                            ctx.item_failures.push(ItemFailure {
                                name: item.name.clone(),
                                group: title.clone(),
                                message: e.to_string(),
                                code: e.domain().and_then(|d| d.code.clone()),
                            });
                            group_failures += 1;
                        }
                    }
                    self.tracker
                        .item_progress(ctx.items_created, ctx.item_failures.len(), total);
                }
            }

            if group_failures == indices.len() {
                let warning = format!(
                    "Every item in group '{}' failed ({} items)",
                    title, group_failures
                );
                warn!("{}", warning);
                ctx.warnings.push(warning);
            }
        }

        info!(
            created = ctx.items_created,
            failed = ctx.item_failures.len(),
            "Items processed"
        );
        Ok(())
    }

    /// Create one item, retrying once with only the notes column when the
    /// service rejects its column values.
    async fn create_item(
        &self,
        board_id: &str,
        group_id: &str,
        item: &TaskItem,
        ctx: &mut RunContext,
    ) -> Result<String> {
        let values = remap_columns(&item.column_values, &ctx.column_ids);

        match self.send_item(board_id, group_id, &item.name, &values).await {
            Err(e) if is_invalid_column_value(&e) => {
                warn!(item = %item.name, "Column values rejected, retrying with notes only");
                let notes_key = ctx
                    .column_ids
                    .get(column_keys::NOTES)
                    .map(String::as_str)
                    .unwrap_or(column_keys::NOTES);
                let minimal: Map<String, Value> = values
                    .into_iter()
                    .filter(|(key, _)| key == notes_key)
                    .collect();

                let item_id = self
                    .send_item(board_id, group_id, &item.name, &minimal)
                    .await?;
                ctx.warnings.push(format!(
                    "Item '{}' was created with notes only after its column values were rejected",
                    item.name
                ));
                Ok(item_id)
            }
            other => other,
        }
    }

    async fn send_item(
        &self,
        board_id: &str,
        group_id: &str,
        name: &str,
        values: &Map<String, Value>,
    ) -> Result<String> {
        let variables = json!({
            "board_id": board_id,
            "group_id": group_id,
            "item_name": name,
            "column_values": serde_json::to_string(values)?,
        });
        let data = self
            .client
            .execute(op::CREATE_ITEM, queries::CREATE_ITEM, variables)
            .await?;
        id_of(&data["create_item"])
            .ok_or_else(|| RenoError::Other(format!("create_item returned no id for '{}'", name)))
    }

    /// Re-read the board and check it matches what was created.
    async fn verify(&self, plan: &BoardPlan, ctx: &RunContext) -> Result<()> {
        let board_id = ctx.board_id()?;
        let data = self
            .client
            .execute(
                op::VERIFY_BOARD,
                queries::VERIFY_BOARD,
                json!({
                    "board_id": [board_id],
                    "limit": self.config.creation.verify_sample,
                }),
            )
            .await?;

        let board = data["boards"]
            .as_array()
            .and_then(|boards| boards.first())
            .ok_or_else(|| {
                RenoError::Verification(format!("Board {} was not found", board_id))
            })?;

        let state = board["state"].as_str().unwrap_or("unknown");
        if state != "active" {
            return Err(RenoError::Verification(format!(
                "Board {} is '{}', expected 'active'",
                board_id, state
            )));
        }

        let remote_titles: Vec<&str> = board["groups"]
            .as_array()
            .map(|groups| groups.iter().filter_map(|g| g["title"].as_str()).collect())
            .unwrap_or_default();
        if let Some(missing) = plan
            .groups
            .iter()
            .find(|group| !remote_titles.contains(&group.title.as_str()))
        {
            return Err(RenoError::Verification(format!(
                "Group '{}' is missing from board {}",
                missing.title, board_id
            )));
        }

        let sample = board["items_page"]["items"]
            .as_array()
            .map_or(0, Vec::len);
        if ctx.items_created > 0 && sample == 0 {
            return Err(RenoError::Verification(format!(
                "Board {} returned no items although {} were created",
                board_id, ctx.items_created
            )));
        }

        info!(board_id = %board_id, groups = remote_titles.len(), sample, "Board verified");
        Ok(())
    }

    fn report(
        &self,
        run_id: Uuid,
        started: Instant,
        plan: &BoardPlan,
        ctx: RunContext,
    ) -> CompletionReport {
        let status = if ctx.item_failures.is_empty() {
            RunStatus::Success
        } else {
            RunStatus::PartialFailure
        };

        let report = CompletionReport {
            run_id,
            board_id: ctx.board_id.unwrap_or_default(),
            board_url: ctx.board_url.unwrap_or_default(),
            groups_created: ctx.groups_created.len(),
            groups_attempted: plan.groups.len(),
            items_created: ctx.items_created,
            items_attempted: ctx.items_attempted,
            elapsed: started.elapsed(),
            item_failures: ctx.item_failures,
            warnings: ctx.warnings,
            status,
            stages: self.tracker.history().to_vec(),
        };

        info!(
            %run_id,
            board_id = %report.board_id,
            items_created = report.items_created,
            items_failed = report.item_failures.len(),
            "Board creation finished"
        );
        report
    }

    fn failure(
        &self,
        run_id: Uuid,
        started: Instant,
        plan: &BoardPlan,
        ctx: RunContext,
        stage: Stage,
        source: RenoError,
    ) -> CreationFailure {
        CreationFailure {
            run_id,
            stage,
            elapsed: started.elapsed(),
            plan: PlanSummary::of(plan),
            board_id: ctx.board_id,
            board_url: ctx.board_url,
            groups_created: ctx.groups_created,
            stages: self.tracker.history().to_vec(),
            source,
        }
    }
}

/// Remote ids come back as strings, occasionally as numbers.
fn id_of(value: &Value) -> Option<String> {
    match &value["id"] {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

fn remap_columns(
    values: &BTreeMap<String, Value>,
    column_ids: &BTreeMap<String, String>,
) -> Map<String, Value> {
    values
        .iter()
        .map(|(key, value)| {
            let key = column_ids.get(key).cloned().unwrap_or_else(|| key.clone());
            (key, value.clone())
        })
        .collect()
}

fn workspaces_of(data: &Value) -> &[Value] {
    data["workspaces"].as_array().map_or(&[], Vec::as_slice)
}

fn is_invalid_reference(err: &RenoError) -> bool {
    matches!(
        err.domain().map(|d| &d.kind),
        Some(DomainErrorKind::InvalidReference)
    )
}

fn is_invalid_column_value(err: &RenoError) -> bool {
    matches!(
        err.domain().map(|d| &d.kind),
        Some(DomainErrorKind::InvalidColumnValue)
    )
}
