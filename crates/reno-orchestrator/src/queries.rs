//! Operation names and query documents sent by the creator

/// Operation names, used for logging and for scripting the mock transport
pub mod op {
    pub const ME: &str = "me";
    pub const WORKSPACES: &str = "workspaces";
    pub const CREATE_BOARD: &str = "create_board";
    pub const CREATE_COLUMN: &str = "create_column";
    pub const CREATE_GROUP: &str = "create_group";
    pub const CREATE_ITEM: &str = "create_item";
    pub const VERIFY_BOARD: &str = "verify_board";
}

pub const ME: &str = "query { me { id name } }";

pub const WORKSPACES: &str = r#"
query ($ids: [ID!]) {
  workspaces(ids: $ids) { id name }
}"#;

pub const CREATE_BOARD: &str = r#"
mutation ($board_name: String!, $board_kind: BoardKind!, $workspace_id: ID) {
  create_board(board_name: $board_name, board_kind: $board_kind, workspace_id: $workspace_id) {
    id
    name
    url
  }
}"#;

pub const CREATE_COLUMN: &str = r#"
mutation ($board_id: ID!, $title: String!, $column_type: ColumnType!, $description: String) {
  create_column(board_id: $board_id, title: $title, column_type: $column_type, description: $description) {
    id
    title
    type
  }
}"#;

/// Without `relative_to` the service puts the new group at the top, so each
/// later group is placed after the previous one.
pub const CREATE_GROUP: &str = r#"
mutation ($board_id: ID!, $group_name: String!, $relative_to: String, $position_relative_method: PositionRelative) {
  create_group(board_id: $board_id, group_name: $group_name, relative_to: $relative_to, position_relative_method: $position_relative_method) {
    id
    title
  }
}"#;

pub const CREATE_ITEM: &str = r#"
mutation ($board_id: ID!, $group_id: String!, $item_name: String!, $column_values: JSON) {
  create_item(board_id: $board_id, group_id: $group_id, item_name: $item_name, column_values: $column_values, create_labels_if_missing: true) {
    id
    name
  }
}"#;

pub const VERIFY_BOARD: &str = r#"
query ($board_id: [ID!], $limit: Int) {
  boards(ids: $board_id) {
    id
    name
    state
    groups { id title }
    items_page(limit: $limit) {
      items { id name group { id title } }
    }
  }
}"#;
