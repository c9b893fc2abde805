use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use stockdesk_sql::{Capability, QueryExecutor};
use tracing::{debug, warn};

use crate::calculators;
use crate::error::AgentError;
use crate::llm::{schema, ToolDefinition};

/// One callable tool with a fixed input schema.
///
/// `call` returns the text handed back to the model. An `Err` means the input
/// did not match the schema; the model sees the error text and can retry.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn definition(&self) -> ToolDefinition;
    async fn call(&self, input: Value) -> Result<String, AgentError>;
}

fn parse_input<T: DeserializeOwned>(tool: &str, input: Value) -> Result<T, AgentError> {
    serde_json::from_value(input).map_err(|e| AgentError::ToolInput {
        tool: tool.to_string(),
        detail: e.to_string(),
    })
}

#[derive(Debug, Deserialize)]
struct CatalogQueryInput {
    query_name: String,
}

/// Runs a named statement from one catalog scope.
pub struct CatalogQueryTool {
    capability: Capability,
    executor: Arc<dyn QueryExecutor>,
}

impl CatalogQueryTool {
    pub fn new(capability: Capability, executor: Arc<dyn QueryExecutor>) -> Self {
        Self {
            capability,
            executor,
        }
    }
}

#[async_trait]
impl Tool for CatalogQueryTool {
    fn name(&self) -> &str {
        self.capability.tool_name()
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            self.capability.tool_name(),
            self.capability.description(),
            schema::object(
                json!({ "query_name": schema::string("The name of the predefined query to execute.") }),
                &["query_name"],
            ),
        )
    }

    async fn call(&self, input: Value) -> Result<String, AgentError> {
        let args: CatalogQueryInput = parse_input(self.name(), input)?;
        Ok(self.capability.run(self.executor.as_ref(), &args.query_name).await)
    }
}

#[derive(Debug, Deserialize)]
struct SqlQueryInput {
    query: String,
}

/// Runs arbitrary read-only SQL written by the model.
pub struct SqlQueryTool {
    executor: Arc<dyn QueryExecutor>,
}

impl SqlQueryTool {
    pub const NAME: &'static str = "sql_query_tool";

    pub fn new(executor: Arc<dyn QueryExecutor>) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl Tool for SqlQueryTool {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            Self::NAME,
            "Execute a read-only SQL query against the SQL Server database. Use this tool to \
             retrieve stock market data, ML predictions, technical signals, strategy tracking, \
             forex data, portfolio data, and family assets. Returns results as a formatted text table.",
            schema::object(
                json!({ "query": schema::string("The SQL query to execute against the SQL Server database.") }),
                &["query"],
            ),
        )
    }

    async fn call(&self, input: Value) -> Result<String, AgentError> {
        let args: SqlQueryInput = parse_input(Self::NAME, input)?;
        debug!(backend = self.executor.backend(), "running ad hoc query");
        Ok(self.executor.execute(&args.query).await.render())
    }
}

#[derive(Debug, Deserialize)]
struct AccuracyInput {
    correct: i64,
    total: i64,
}

pub struct AccuracyCalculator;

#[async_trait]
impl Tool for AccuracyCalculator {
    fn name(&self) -> &str {
        "accuracy_calculator"
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            self.name(),
            "Calculate prediction accuracy percentage. Provide the number of correct predictions \
             and total predictions.",
            schema::object(
                json!({
                    "correct": schema::integer("Number of correct predictions."),
                    "total": schema::integer("Total number of predictions."),
                }),
                &["correct", "total"],
            ),
        )
    }

    async fn call(&self, input: Value) -> Result<String, AgentError> {
        let args: AccuracyInput = parse_input(self.name(), input)?;
        Ok(calculators::accuracy(args.correct, args.total))
    }
}

#[derive(Debug, Deserialize)]
struct PnlInput {
    entry_price: f64,
    current_price: f64,
    quantity: i64,
}

pub struct PnlCalculator;

#[async_trait]
impl Tool for PnlCalculator {
    fn name(&self) -> &str {
        "pnl_calculator"
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            self.name(),
            "Calculate profit/loss for a stock position. Provide entry price, current price, and quantity.",
            schema::object(
                json!({
                    "entry_price": schema::number("Entry/buy price."),
                    "current_price": schema::number("Current/exit price."),
                    "quantity": schema::integer("Number of shares."),
                }),
                &["entry_price", "current_price", "quantity"],
            ),
        )
    }

    async fn call(&self, input: Value) -> Result<String, AgentError> {
        let args: PnlInput = parse_input(self.name(), input)?;
        Ok(calculators::profit_and_loss(
            args.entry_price,
            args.current_price,
            args.quantity,
        ))
    }
}

#[derive(Debug, Deserialize)]
struct RiskRewardInput {
    entry_price: f64,
    stop_loss: f64,
    take_profit: f64,
}

pub struct RiskRewardCalculator;

#[async_trait]
impl Tool for RiskRewardCalculator {
    fn name(&self) -> &str {
        "risk_reward_calculator"
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            self.name(),
            "Calculate risk/reward ratio for a trade setup. Provide entry price, stop loss, and \
             take profit levels.",
            schema::object(
                json!({
                    "entry_price": schema::number("Entry price."),
                    "stop_loss": schema::number("Stop loss price."),
                    "take_profit": schema::number("Take profit/target price."),
                }),
                &["entry_price", "stop_loss", "take_profit"],
            ),
        )
    }

    async fn call(&self, input: Value) -> Result<String, AgentError> {
        let args: RiskRewardInput = parse_input(self.name(), input)?;
        Ok(calculators::risk_reward(
            args.entry_price,
            args.stop_loss,
            args.take_profit,
        ))
    }
}

/// Result of dispatching one tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub content: String,
    pub is_error: bool,
}

/// The fixed tool set of one specialist.
#[derive(Default)]
pub struct Toolbox {
    tools: Vec<Arc<dyn Tool>>,
}

impl Toolbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, tool: impl Tool + 'static) -> Self {
        self.tools.push(Arc::new(tool));
        self
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.definition()).collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Route a call by tool name. Never fails; problems come back as error output.
    pub async fn dispatch(&self, name: &str, input: Value) -> ToolOutput {
        let Some(tool) = self.tools.iter().find(|t| t.name() == name) else {
            warn!(tool = name, "model requested an unknown tool");
            return ToolOutput {
                content: format!(
                    "Unknown tool '{name}'. Available tools: {}",
                    self.names().join(", ")
                ),
                is_error: true,
            };
        };

        match tool.call(input).await {
            Ok(content) => {
                debug!(tool = name, bytes = content.len(), "tool call finished");
                ToolOutput {
                    content,
                    is_error: false,
                }
            }
            Err(e) => {
                warn!(tool = name, error = %e, "tool call rejected");
                ToolOutput {
                    content: e.to_string(),
                    is_error: true,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calculators() -> Toolbox {
        Toolbox::new()
            .with(AccuracyCalculator)
            .with(PnlCalculator)
            .with(RiskRewardCalculator)
    }

    #[tokio::test]
    async fn dispatch_routes_by_name() {
        let out = calculators()
            .dispatch("accuracy_calculator", json!({ "correct": 3, "total": 4 }))
            .await;
        assert_eq!(out.content, "Accuracy: 75.00% (3/4)");
        assert!(!out.is_error);
    }

    #[tokio::test]
    async fn dispatch_unknown_tool_lists_available() {
        let out = calculators().dispatch("weather", json!({})).await;
        assert!(out.is_error);
        assert_eq!(
            out.content,
            "Unknown tool 'weather'. Available tools: accuracy_calculator, pnl_calculator, \
             risk_reward_calculator"
        );
    }

    #[tokio::test]
    async fn bad_input_is_an_error_output() {
        let out = calculators()
            .dispatch("pnl_calculator", json!({ "entry_price": "ten" }))
            .await;
        assert!(out.is_error);
        assert!(out.content.starts_with("Invalid input for pnl_calculator:"));
    }

    #[test]
    fn definitions_carry_required_fields() {
        let defs = calculators().definitions();
        assert_eq!(defs.len(), 3);
        assert_eq!(
            defs[2].input_schema["required"],
            json!(["entry_price", "stop_loss", "take_profit"])
        );
    }
}
