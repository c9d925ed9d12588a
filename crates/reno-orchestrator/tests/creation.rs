//! Integration tests for the board creation pipeline.
//!
//! Every test runs the full stage sequence against a scripted transport, so
//! the rate limiter and retry layers are exercised exactly as in production.

use reno_client::{ApiClient, MockReply, MockTransport};
use reno_core::{
    column_keys, BoardGroup, BoardPlan, Provenance, RenoConfig, RenoError, ScopeChoice,
    Selection, SourceKind, TaskItem, DESIGN_GROUP, PERMITTING_GROUP,
};
use reno_orchestrator::queries::op;
use reno_orchestrator::{
    BoardCreator, CancelHandle, ChannelSink, ProgressEvent, ProgressKind, ProgressSink,
    RunStatus, Stage,
};
use reno_planning::{StaticCatalog, SynthesisOptions, Synthesizer, UnavailableEnhancer, STANDARD_COLUMNS};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

const AREA: &str = "Bathroom";

const BATHROOM_ITEMS: &[&str] = &[
    "Select Fixture",
    "Remove Old Vanity",
    "Rough-In Plumbing",
    "Install Vanity",
    "Set Toilet",
    "Seal Fixtures",
    "Connect Supply Lines",
    "Final Inspection",
];

fn task(group: &str, position: usize, name: &str) -> TaskItem {
    TaskItem {
        name: name.to_string(),
        group_title: group.to_string(),
        position,
        column_values: BTreeMap::from([
            (
                column_keys::STATUS.to_string(),
                json!({"label": "Not Started"}),
            ),
            (column_keys::PRIORITY.to_string(), json!({"labels": ["High"]})),
            (column_keys::NOTES.to_string(), json!(format!("Notes for {}", name))),
        ]),
        provenance: Provenance::of(SourceKind::Step),
        remote_id: None,
    }
}

/// Three groups, ten items: one in each fixed group plus eight in the area.
fn ten_item_plan() -> BoardPlan {
    let groups = [DESIGN_GROUP, PERMITTING_GROUP, AREA]
        .iter()
        .enumerate()
        .map(|(position, title)| BoardGroup {
            title: title.to_string(),
            position,
            remote_id: None,
        })
        .collect();

    let mut items = vec![
        task(DESIGN_GROUP, 0, "Initial consultation"),
        task(PERMITTING_GROUP, 0, "Submit permit application"),
    ];
    items.extend(
        BATHROOM_ITEMS
            .iter()
            .enumerate()
            .map(|(position, name)| task(AREA, position, name)),
    );

    BoardPlan {
        board_name: "Maple Ave - Renovation Project".to_string(),
        groups,
        items,
        enrichments: Vec::new(),
    }
}

fn group_id(title: &str) -> String {
    format!("g_{}", title.to_lowercase().replace(' ', "_"))
}

fn verify_reply(state: &str, titles: &[&str], items: usize) -> MockReply {
    let groups: Vec<Value> = titles
        .iter()
        .map(|t| json!({"id": group_id(t), "title": t}))
        .collect();
    let sample: Vec<Value> = (0..items)
        .map(|i| json!({"id": format!("i{}", i), "name": "x"}))
        .collect();
    MockReply::Data(json!({
        "boards": [{
            "id": "100",
            "name": "Maple Ave - Renovation Project",
            "state": state,
            "groups": groups,
            "items_page": {"items": sample},
        }]
    }))
}

/// A service that accepts everything for `plan`.
fn happy_mock(plan: &BoardPlan) -> MockTransport {
    let mut mock = MockTransport::new()
        .with_reply(op::ME, MockReply::Data(json!({"me": {"id": "7", "name": "Sam"}})))
        .with_reply(
            op::WORKSPACES,
            MockReply::Data(json!({"workspaces": [{"id": "ws_main", "name": "Main"}]})),
        )
        .with_reply(
            op::CREATE_BOARD,
            MockReply::Data(json!({"create_board": {
                "id": "100",
                "name": "Maple Ave - Renovation Project",
                "url": "https://acme.monday.com/boards/100"
            }})),
        )
        .with_reply(op::CREATE_ITEM, MockReply::Data(json!({"create_item": {"id": "item"}})));

    for column in STANDARD_COLUMNS {
        mock = mock.with_reply_when(
            op::CREATE_COLUMN,
            move |vars| vars["title"] == column.title,
            MockReply::Data(json!({"create_column": {"id": format!("{}_1", column.key)}})),
        );
    }

    for group in &plan.groups {
        let title = group.title.clone();
        let reply = MockReply::Data(json!({"create_group": {"id": group_id(&title)}}));
        mock = mock.with_reply_when(
            op::CREATE_GROUP,
            move |vars| vars["group_name"] == title.as_str(),
            reply,
        );
    }

    let titles: Vec<&str> = plan.groups.iter().map(|g| g.title.as_str()).collect();
    mock.with_reply(op::VERIFY_BOARD, verify_reply("active", &titles, 5))
}

fn creator(mock: &MockTransport, config: RenoConfig) -> BoardCreator {
    let client = ApiClient::with_transport(mock.clone(), &config);
    BoardCreator::new(client, config)
}

fn column_values(call: &Value) -> serde_json::Map<String, Value> {
    let raw = call["column_values"].as_str().unwrap();
    serde_json::from_str(raw).unwrap()
}

fn item_named(name: &'static str) -> impl Fn(&Value) -> bool + Send + Sync + 'static {
    move |vars: &Value| vars["item_name"] == name
}

#[tokio::test(start_paused = true)]
async fn test_successful_run_creates_everything() {
    let mut plan = ten_item_plan();
    let mock = happy_mock(&plan);

    let report = creator(&mock, RenoConfig::default())
        .run(&mut plan)
        .await
        .unwrap();

    assert_eq!(report.status, RunStatus::Success);
    assert_eq!(report.board_id, "100");
    assert_eq!(report.board_url, "https://acme.monday.com/boards/100");
    assert_eq!((report.groups_created, report.groups_attempted), (3, 3));
    assert_eq!((report.items_created, report.items_attempted), (10, 10));
    assert!(report.item_failures.is_empty());
    assert!(report.warnings.is_empty());
    assert_eq!(report.stages.len(), 6);
    assert!(report.stages.iter().all(|s| s.success));

    // Remote ids are written back into the plan
    assert!(plan.groups.iter().all(|g| g.remote_id.is_some()));
    assert!(plan.items.iter().all(|i| i.remote_id.as_deref() == Some("item")));

    // Column values use the remote column ids
    let first_item = &mock.calls_for(op::CREATE_ITEM)[0].variables;
    let values = column_values(first_item);
    assert!(values.contains_key("status_1"));
    assert!(values.contains_key("dropdown_1"));
    assert!(values.contains_key("text_1"));
    assert!(!values.contains_key(column_keys::STATUS));
}

#[tokio::test(start_paused = true)]
async fn test_groups_are_created_in_plan_order() {
    let mut plan = ten_item_plan();
    let mock = happy_mock(&plan);

    creator(&mock, RenoConfig::default())
        .run(&mut plan)
        .await
        .unwrap();

    let calls = mock.calls_for(op::CREATE_GROUP);
    let names: Vec<&str> = calls
        .iter()
        .map(|c| c.variables["group_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec![DESIGN_GROUP, PERMITTING_GROUP, AREA]);

    assert!(calls[0].variables.get("relative_to").is_none());
    assert_eq!(calls[1].variables["relative_to"], group_id(DESIGN_GROUP));
    assert_eq!(calls[1].variables["position_relative_method"], "after_at");
    assert_eq!(calls[2].variables["relative_to"], group_id(PERMITTING_GROUP));

    // Every item call targets its own group, in plan order within the group
    let item_calls = mock.calls_for(op::CREATE_ITEM);
    let bathroom: Vec<&str> = item_calls
        .iter()
        .filter(|c| c.variables["group_id"] == group_id(AREA).as_str())
        .map(|c| c.variables["item_name"].as_str().unwrap())
        .collect();
    assert_eq!(bathroom, BATHROOM_ITEMS.to_vec());
}

#[tokio::test(start_paused = true)]
async fn test_item_failures_produce_partial_failure() {
    let mut plan = ten_item_plan();
    let mock = happy_mock(&plan)
        .with_reply_when(
            op::CREATE_ITEM,
            item_named("Install Vanity"),
            MockReply::ApiError {
                code: "ItemsLimitationException".into(),
                message: "Board item limit reached".into(),
            },
        )
        .with_reply_when(
            op::CREATE_ITEM,
            item_named("Seal Fixtures"),
            MockReply::ApiError {
                code: "SomethingUnexpected".into(),
                message: "Unexpected failure".into(),
            },
        );

    let report = creator(&mock, RenoConfig::default())
        .run(&mut plan)
        .await
        .unwrap();

    assert_eq!(report.status, RunStatus::PartialFailure);
    assert_eq!(report.items_created, 8);
    assert_eq!(report.items_attempted, 10);
    assert_eq!(report.item_failures.len(), 2);

    let failed: Vec<&str> = report
        .item_failures
        .iter()
        .map(|f| f.name.as_str())
        .collect();
    assert_eq!(failed, vec!["Install Vanity", "Seal Fixtures"]);
    assert!(report.item_failures[0].message.contains("Board item limit reached"));
    assert_eq!(
        report.item_failures[0].code.as_deref(),
        Some("ItemsLimitationException")
    );
    assert!(report.item_failures.iter().all(|f| f.group == AREA));

    // Domain errors are not retried
    let vanity_calls = mock
        .calls_for(op::CREATE_ITEM)
        .into_iter()
        .filter(|c| c.variables["item_name"] == "Install Vanity")
        .count();
    assert_eq!(vanity_calls, 1);

    let unplaced: Vec<&str> = plan
        .items
        .iter()
        .filter(|i| i.remote_id.is_none())
        .map(|i| i.name.as_str())
        .collect();
    assert_eq!(unplaced, vec!["Install Vanity", "Seal Fixtures"]);
}

#[tokio::test(start_paused = true)]
async fn test_group_wide_item_failure_is_a_warning() {
    let mut plan = ten_item_plan();
    let mock = happy_mock(&plan).with_reply_when(
        op::CREATE_ITEM,
        |vars| vars["group_id"] == group_id(PERMITTING_GROUP).as_str(),
        MockReply::ApiError {
            code: "InvalidGroupIdException".into(),
            message: "group not found".into(),
        },
    );

    let report = creator(&mock, RenoConfig::default())
        .run(&mut plan)
        .await
        .unwrap();

    assert_eq!(report.status, RunStatus::PartialFailure);
    assert_eq!(report.items_created, 9);
    assert!(report
        .warnings
        .iter()
        .any(|w| w.contains("Every item in group 'Permitting' failed")));
}

#[tokio::test(start_paused = true)]
async fn test_group_failure_is_fatal() {
    let mut plan = ten_item_plan();
    let mock = happy_mock(&plan).with_reply_when(
        op::CREATE_GROUP,
        |vars| vars["group_name"] == PERMITTING_GROUP,
        MockReply::ApiError {
            code: "InvalidBoardIdException".into(),
            message: "board does not exist".into(),
        },
    );

    let failure = creator(&mock, RenoConfig::default())
        .run(&mut plan)
        .await
        .unwrap_err();

    assert_eq!(failure.stage, Stage::CreatingGroups);
    assert_eq!(failure.board_id.as_deref(), Some("100"));
    assert_eq!(failure.groups_created, vec![DESIGN_GROUP.to_string()]);
    assert_eq!(failure.plan.total_items, 10);
    assert!(failure.user_message().contains("workspace ID"));
    assert!(mock.calls_for(op::CREATE_ITEM).is_empty());

    let last = failure.stages.last().unwrap();
    assert_eq!(last.stage, Stage::CreatingGroups);
    assert!(!last.success);
}

#[tokio::test(start_paused = true)]
async fn test_unauthorized_token_fails_before_board_exists() {
    let mut plan = ten_item_plan();
    let mock = happy_mock(&plan).with_reply(
        op::ME,
        MockReply::ApiError {
            code: "UserUnauthorizedException".into(),
            message: "Not Authenticated".into(),
        },
    );

    let failure = creator(&mock, RenoConfig::default())
        .run(&mut plan)
        .await
        .unwrap_err();

    assert_eq!(failure.stage, Stage::Validating);
    assert!(failure.is_unauthorized());
    assert_eq!(
        failure.user_message(),
        "Authentication failed. Please check your API token."
    );
    assert!(failure.board_id.is_none());
    assert_eq!(mock.calls_for(op::ME).len(), 1);
    assert!(mock.calls_for(op::CREATE_BOARD).is_empty());
}

/// Answers an unfiltered workspace listing with `workspaces`.
fn listing_all(mock: MockTransport, workspaces: Value) -> MockTransport {
    mock.with_reply_when(
        op::WORKSPACES,
        |vars| vars["ids"].is_null(),
        MockReply::Data(json!({ "workspaces": workspaces })),
    )
}

#[tokio::test(start_paused = true)]
async fn test_unknown_workspace_falls_back_to_first_accessible() {
    let mut plan = ten_item_plan();
    let mock = happy_mock(&plan).with_reply_when(
        op::WORKSPACES,
        |vars| vars["ids"] == json!(["ws_missing"]),
        MockReply::Data(json!({"workspaces": []})),
    );
    let mock = listing_all(
        mock,
        json!([{"id": "ws_team", "name": "Team"}, {"id": "ws_other", "name": "Other"}]),
    );

    let report = creator(&mock, RenoConfig::default())
        .with_workspace("ws_missing")
        .run(&mut plan)
        .await
        .unwrap();

    assert!(report.is_success());
    assert_eq!(mock.calls_for(op::WORKSPACES).len(), 2);
    let board = mock.calls_for(op::CREATE_BOARD);
    assert_eq!(board.len(), 1);
    assert_eq!(board[0].variables["workspace_id"], "ws_team");
    assert!(report
        .warnings
        .iter()
        .any(|w| w.contains("'ws_missing'") && w.contains("'Team' (ws_team)")));
}

#[tokio::test(start_paused = true)]
async fn test_rejected_workspace_falls_back_to_first_accessible() {
    let mut plan = ten_item_plan();
    let mock = happy_mock(&plan).with_reply_when(
        op::CREATE_BOARD,
        |vars| vars["workspace_id"] == "ws_stale",
        MockReply::ApiError {
            code: "InvalidWorkspaceIdException".into(),
            message: "Workspace not found".into(),
        },
    );
    let mock = listing_all(mock, json!([{"id": "ws_team", "name": "Team"}]));

    let report = creator(&mock, RenoConfig::default())
        .with_workspace("ws_stale")
        .run(&mut plan)
        .await
        .unwrap();

    let attempts: Vec<Value> = mock
        .calls_for(op::CREATE_BOARD)
        .into_iter()
        .map(|c| c.variables["workspace_id"].clone())
        .collect();
    assert_eq!(attempts, vec![json!("ws_stale"), json!("ws_team")]);
    assert_eq!(report.board_id, "100");
    assert_eq!(report.warnings.len(), 1);
    assert!(report.warnings[0].contains("'ws_stale'"));
}

#[tokio::test(start_paused = true)]
async fn test_no_accessible_workspace_fails_validation() {
    let mut plan = ten_item_plan();
    let mock = happy_mock(&plan).with_reply(
        op::WORKSPACES,
        MockReply::Data(json!({"workspaces": []})),
    );

    let failure = creator(&mock, RenoConfig::default())
        .with_workspace("ws_missing")
        .run(&mut plan)
        .await
        .unwrap_err();

    assert_eq!(failure.stage, Stage::Validating);
    assert!(matches!(failure.source, RenoError::Validation(_)));
    assert!(failure.user_message().starts_with("validating: "));
    assert!(failure.user_message().contains("no other workspace is available"));
    assert_eq!(mock.calls_for(op::WORKSPACES).len(), 2);
    assert!(mock.calls_for(op::CREATE_BOARD).is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_workspace_is_passed_to_board_creation() {
    let mut plan = ten_item_plan();
    let mock = happy_mock(&plan);

    creator(&mock, RenoConfig::default())
        .with_workspace("ws_main")
        .run(&mut plan)
        .await
        .unwrap();

    assert_eq!(mock.calls_for(op::WORKSPACES)[0].variables["ids"], json!(["ws_main"]));
    let board = &mock.calls_for(op::CREATE_BOARD)[0].variables;
    assert_eq!(board["workspace_id"], "ws_main");
    assert_eq!(board["board_kind"], "public");
    assert_eq!(board["board_name"], "Maple Ave - Renovation Project");
}

#[tokio::test(start_paused = true)]
async fn test_transient_board_failure_is_retried() {
    let mut plan = ten_item_plan();
    let mock = happy_mock(&plan).with_sequence(
        op::CREATE_BOARD,
        vec![
            MockReply::Network("connection reset".into()),
            MockReply::Data(json!({"create_board": {"id": "100", "name": "x"}})),
        ],
    );

    let report = creator(&mock, RenoConfig::default())
        .run(&mut plan)
        .await
        .unwrap();

    assert_eq!(mock.calls_for(op::CREATE_BOARD).len(), 2);
    // No url in the response: fall back to the board address
    assert_eq!(report.board_url, "https://monday.com/boards/100");
}

#[tokio::test(start_paused = true)]
async fn test_column_failure_is_a_warning() {
    let mut plan = ten_item_plan();
    let mock = happy_mock(&plan).with_reply_when(
        op::CREATE_COLUMN,
        |vars| vars["title"] == "Priority",
        MockReply::Status {
            status: 500,
            body: "Internal Server Error".into(),
            retry_after: None,
        },
    );

    let report = creator(&mock, RenoConfig::default())
        .run(&mut plan)
        .await
        .unwrap();

    assert_eq!(report.status, RunStatus::Success);
    assert_eq!(report.warnings.len(), 1);
    assert!(report.warnings[0].contains("Priority"));

    let values = column_values(&mock.calls_for(op::CREATE_ITEM)[0].variables);
    assert!(values.contains_key(column_keys::PRIORITY));
    assert!(values.contains_key("status_1"));
}

#[tokio::test(start_paused = true)]
async fn test_rejected_column_values_retry_with_notes_only() {
    let mut plan = ten_item_plan();
    let mock = happy_mock(&plan).with_reply_when(
        op::CREATE_ITEM,
        |vars| {
            vars["item_name"] == "Install Vanity"
                && vars["column_values"]
                    .as_str()
                    .map_or(false, |raw| raw.contains("status_1"))
        },
        MockReply::ApiError {
            code: "ColumnValueException".into(),
            message: "invalid value for column status".into(),
        },
    );

    let report = creator(&mock, RenoConfig::default())
        .run(&mut plan)
        .await
        .unwrap();

    assert_eq!(report.status, RunStatus::Success);
    assert_eq!(report.items_created, 10);
    assert!(report.warnings.iter().any(|w| w.contains("Install Vanity")));

    let attempts: Vec<_> = mock
        .calls_for(op::CREATE_ITEM)
        .into_iter()
        .filter(|c| c.variables["item_name"] == "Install Vanity")
        .collect();
    assert_eq!(attempts.len(), 2);

    let retry = column_values(&attempts[1].variables);
    assert_eq!(retry.len(), 1);
    assert_eq!(retry["text_1"], "Notes for Install Vanity");
}

#[tokio::test(start_paused = true)]
async fn test_inactive_board_fails_verification() {
    let mut plan = ten_item_plan();
    let mock = happy_mock(&plan).with_reply(
        op::VERIFY_BOARD,
        verify_reply("archived", &[DESIGN_GROUP, PERMITTING_GROUP, AREA], 5),
    );

    let failure = creator(&mock, RenoConfig::default())
        .run(&mut plan)
        .await
        .unwrap_err();

    assert_eq!(failure.stage, Stage::Verifying);
    assert!(matches!(failure.source, RenoError::Verification(_)));
    assert_eq!(failure.board_id.as_deref(), Some("100"));
    // Data was created even though the run failed
    assert!(plan.items.iter().all(|i| i.remote_id.is_some()));
}

#[tokio::test(start_paused = true)]
async fn test_missing_group_fails_verification() {
    let mut plan = ten_item_plan();
    let mock = happy_mock(&plan).with_reply(
        op::VERIFY_BOARD,
        verify_reply("active", &[DESIGN_GROUP, PERMITTING_GROUP], 5),
    );

    let failure = creator(&mock, RenoConfig::default())
        .run(&mut plan)
        .await
        .unwrap_err();

    assert_eq!(failure.stage, Stage::Verifying);
    assert!(failure.source.to_string().contains("Bathroom"));
}

#[tokio::test(start_paused = true)]
async fn test_cancel_before_run_makes_no_calls() {
    let mut plan = ten_item_plan();
    let mock = happy_mock(&plan);
    let cancel = CancelHandle::new();
    cancel.cancel();

    let failure = creator(&mock, RenoConfig::default())
        .with_cancel(cancel)
        .run(&mut plan)
        .await
        .unwrap_err();

    assert!(failure.is_cancelled());
    assert_eq!(failure.stage, Stage::Validating);
    assert!(mock.calls().is_empty());
}

/// Requests cancellation as soon as `stage` is entered.
struct CancelOnStage {
    handle: CancelHandle,
    stage: Stage,
}

impl ProgressSink for CancelOnStage {
    fn emit(&self, event: &ProgressEvent) {
        if event.stage == self.stage && event.kind == ProgressKind::StageStarted {
            self.handle.cancel();
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_cancel_takes_effect_at_stage_boundary() {
    let mut plan = ten_item_plan();
    let mock = happy_mock(&plan);
    let cancel = CancelHandle::new();

    let failure = creator(&mock, RenoConfig::default())
        .with_cancel(cancel.clone())
        .with_sink(CancelOnStage {
            handle: cancel,
            stage: Stage::CreatingGroups,
        })
        .run(&mut plan)
        .await
        .unwrap_err();

    assert!(failure.is_cancelled());
    assert_eq!(failure.stage, Stage::CreatingGroups);
    assert_eq!(failure.board_id.as_deref(), Some("100"));
    assert!(failure.user_message().contains("cancelled before creating groups"));
    assert_eq!(mock.calls_for(op::CREATE_COLUMN).len(), STANDARD_COLUMNS.len());
    assert!(mock.calls_for(op::CREATE_GROUP).is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_progress_is_monotonic_and_complete() {
    let mut plan = ten_item_plan();
    let mock = happy_mock(&plan);
    let (tx, mut rx) = mpsc::unbounded_channel();

    creator(&mock, RenoConfig::default())
        .with_sink(ChannelSink::new(tx))
        .run(&mut plan)
        .await
        .unwrap();

    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }

    let percents: Vec<u8> = events.iter().map(|e| e.percent).collect();
    assert!(percents.windows(2).all(|w| w[0] <= w[1]));

    let started: Vec<Stage> = events
        .iter()
        .filter(|e| e.kind == ProgressKind::StageStarted)
        .map(|e| e.stage)
        .collect();
    assert_eq!(started, Stage::ALL[..6].to_vec());

    let item_updates = events
        .iter()
        .filter(|e| matches!(e.kind, ProgressKind::ItemProgress { .. }))
        .count();
    assert_eq!(item_updates, 10);

    let last = events.last().unwrap();
    assert_eq!(last.kind, ProgressKind::Finished);
    assert_eq!(last.percent, 100);
    assert_eq!(last.label, "Complete!");
}

#[tokio::test(start_paused = true)]
async fn test_items_are_sent_in_paced_batches() {
    let mut plan = ten_item_plan();
    let mock = happy_mock(&plan);
    let mut config = RenoConfig::default();
    config.creation.batch_size = 4;
    config.creation.batch_pause_ms = 500;

    creator(&mock, config).run(&mut plan).await.unwrap();

    // Bathroom's eight items form two batches of four
    let bathroom: Vec<_> = mock
        .calls_for(op::CREATE_ITEM)
        .into_iter()
        .filter(|c| c.variables["group_id"] == group_id(AREA).as_str())
        .collect();
    assert_eq!(bathroom.len(), 8);
    assert!(bathroom[4].at - bathroom[3].at >= Duration::from_millis(500));
    assert!(bathroom[2].at - bathroom[1].at < Duration::from_millis(500));
}

#[tokio::test(start_paused = true)]
async fn test_synthesized_plan_end_to_end() {
    let synthesizer = Synthesizer::new(
        Arc::new(StaticCatalog::new()),
        Arc::new(UnavailableEnhancer),
        SynthesisOptions::default(),
    );
    let selection = Selection::new("Maple Ave")
        .with_scope(AREA, ScopeChoice::new("Toilet replacement or upgrade"));
    let mut plan = synthesizer.synthesize(&selection).await.unwrap();
    let expected_items = plan.items.len();

    let mock = happy_mock(&plan);
    let report = creator(&mock, RenoConfig::default())
        .run(&mut plan)
        .await
        .unwrap();

    assert_eq!(report.status, RunStatus::Success);
    assert_eq!(report.groups_created, 3);
    assert_eq!(report.items_created, expected_items);
    assert_eq!(mock.calls_for(op::CREATE_ITEM).len(), expected_items);
}
