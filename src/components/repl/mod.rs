use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::json;
use tabled::{builder::Builder, settings::Style, Table, Tabled};
use tracing::debug;

use crate::components::{
    analytics::{
        axis_options, breakdown_options, compute_breakdown, compute_filter_options,
        compute_overview, compute_table, compute_timeline, paginate, BreakdownPoint,
        BreakdownRequest, DateWindow, FilterOptions, FilterSelection, Granularity, Overview, Page,
        TableFilters, TimelineBucket,
    },
    config::DashboardDefaults,
    store::{
        record::{OrderRecord, COLUMNS},
        record_store::RecordStore,
        schema::OrderRecordInput,
    },
};

mod help;
use help::{get_general_help, CommandHelp, COMMAND_HELP};

/// Represents different output format options for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Standard, // Plain text format with human-readable output
    JSON,     // Structured JSON format for programmatic consumption
    Table,    // ASCII table format for aligned columnar display
}

/// Represents all console commands with their parsed parameters.
#[derive(Debug, Clone)]
pub enum Command {
    // Landing page
    Overview,

    // Data table page
    Options {
        selection: FilterSelection,
    },
    Table {
        filters: TableFilters,
        page: usize, // Zero-based
        page_size: Option<usize>,
    },
    NextId,
    Add {
        input: OrderRecordInput,
    },

    // Chart page
    Timeline {
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        granularity: Option<Granularity>,
    },
    Breakdown {
        x: Option<String>,
        y: Option<String>,
        size: Option<String>,
        group: Option<String>,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    },
    Axes {
        exclude: Option<String>,
    },

    Help {
        command: Option<String>,
    },
}

impl Command {
    fn kind(&self) -> CommandBasic {
        match self {
            Command::Overview => CommandBasic::Overview,
            Command::Options { .. } => CommandBasic::Options,
            Command::Table { .. } => CommandBasic::Table,
            Command::NextId => CommandBasic::NextId,
            Command::Add { .. } => CommandBasic::Add,
            Command::Timeline { .. } => CommandBasic::Timeline,
            Command::Breakdown { .. } => CommandBasic::Breakdown,
            Command::Axes { .. } => CommandBasic::Axes,
            Command::Help { .. } => CommandBasic::Help,
        }
    }
}

/// Command kinds, used for output formatting decisions.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
enum CommandBasic {
    Overview,
    Options,
    Table,
    NextId,
    Add,
    Timeline,
    Breakdown,
    Axes,
    Help,
}

/// Line-oriented console over a record store.
/// Each call to `execute` reads a fresh snapshot of the store.
pub struct REPL<'a> {
    store: &'a RecordStore,
    defaults: DashboardDefaults,
}

/// Represents the result of a command execution including metadata.
#[derive(Serialize, Debug)]
struct CommandResult {
    executed_command: CommandBasic,
    success: bool,
    message: String,                 // Already rendered for the requested format
    data: Option<serde_json::Value>, // Structured payload for JSON output
    timestamp: String,               // ISO 8601 timestamp of execution
}

impl CommandResult {
    fn new(executed_command: CommandBasic, message: String, data: Option<serde_json::Value>) -> Self {
        CommandResult {
            executed_command,
            success: true,
            message,
            data,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// A command that stopped its chain. Earlier results in the chain are kept.
    fn failed(executed_command: CommandBasic, error: String) -> Self {
        CommandResult {
            executed_command,
            success: false,
            message: error,
            data: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Used for displaying command execution status in table format
#[derive(Tabled)]
struct StatusTable {
    status: String,
    message: String,
    timestamp: String,
}

#[derive(Tabled)]
struct TimelineRow {
    period_start: String,
    period_end: String,
    orders: usize,
    sales: String,
    profit: String,
    profit_ratio: String,
    discount: String,
    quantity: i64,
    days_to_ship: i64,
}

#[derive(Tabled)]
struct BreakdownRow {
    id: u64,
    x: String,
    y: String,
    size: String,
    group: String,
}

const OPTIONS_ARGS: [&str; 3] = ["country", "state", "category"];
const TABLE_ARGS: [&str; 7] = [
    "country",
    "state",
    "city",
    "category",
    "sub_category",
    "page",
    "page_size",
];
const TIMELINE_ARGS: [&str; 3] = ["start", "end", "granularity"];
const BREAKDOWN_ARGS: [&str; 6] = ["x", "y", "size", "group", "start", "end"];
const AXES_ARGS: [&str; 1] = ["exclude"];

impl<'a> REPL<'a> {
    pub fn new(store: &'a RecordStore, defaults: DashboardDefaults) -> REPL<'a> {
        REPL { store, defaults }
    }

    /// Executes a command string and returns formatted output.
    /// Chained commands stop at the first failure.
    pub fn execute(&self, input: &str, format: Option<OutputFormat>) -> Result<String, String> {
        let format = format.unwrap_or(OutputFormat::Standard);

        let result = (|| {
            let commands = self.parse_commands(input)?;
            let mut results = Vec::new();

            for cmd in commands {
                let kind = cmd.kind();
                match self.run(cmd, format) {
                    Ok(result) => results.push(result),
                    Err(e) if format == OutputFormat::Standard => return Err(e),
                    Err(e) => {
                        results.push(CommandResult::failed(kind, e));
                        break;
                    }
                }
            }

            self.format_results(&results, format)
        })();

        match result {
            Ok(output) => Ok(output),
            Err(e) => match format {
                OutputFormat::Standard => Err(e),
                OutputFormat::JSON => Ok(json!({
                    "success": false,
                    "error": e,
                    "timestamp": chrono::Utc::now().to_rfc3339()
                })
                .to_string()),
                OutputFormat::Table => {
                    let results = vec![StatusTable {
                        status: String::from("ERROR"),
                        message: e,
                        timestamp: chrono::Utc::now().to_rfc3339(),
                    }];

                    Ok(Table::new(results).with(Style::ascii()).to_string())
                }
            },
        }
    }

    fn run(&self, cmd: Command, format: OutputFormat) -> Result<CommandResult, String> {
        let tabular = format == OutputFormat::Table;

        let result = match cmd {
            Command::Overview => {
                let overview = compute_overview(&self.store.load());
                let message = if tabular {
                    self.format_overview_table(&overview)
                } else {
                    self.format_overview(&overview)
                };
                CommandResult::new(CommandBasic::Overview, message, Some(to_json(&overview)?))
            }
            Command::Options { selection } => {
                let options = compute_filter_options(&self.store.load(), &selection);
                let message = self.format_options(&options, tabular);
                CommandResult::new(CommandBasic::Options, message, Some(to_json(&options)?))
            }
            Command::Table {
                filters,
                page,
                page_size,
            } => {
                let rows = compute_table(&self.store.load(), &filters);
                let page = paginate(
                    rows,
                    page_size.unwrap_or(self.defaults.page_size),
                    page,
                );
                debug!(
                    "Table page {} holds {} of {} rows",
                    page.page,
                    page.rows.len(),
                    page.total_rows
                );
                let message = if tabular {
                    self.format_page_table(&page)
                } else {
                    self.format_page(&page)
                };
                CommandResult::new(CommandBasic::Table, message, Some(to_json(&page)?))
            }
            Command::NextId => {
                let next_id = self.store.next_id();
                CommandResult::new(
                    CommandBasic::NextId,
                    format!("Next record id: {}", next_id),
                    Some(json!({ "next_id": next_id })),
                )
            }
            Command::Add { input } => {
                let record = self.store.append(input).map_err(|e| e.to_string())?;
                CommandResult::new(
                    CommandBasic::Add,
                    format!(
                        "Added record {} (order {})",
                        record.id,
                        record.order_id.as_deref().unwrap_or("NULL")
                    ),
                    Some(to_json(&record)?),
                )
            }
            Command::Timeline {
                start,
                end,
                granularity,
            } => {
                let records = self.store.load();
                let granularity = granularity
                    .unwrap_or_else(|| Granularity::parse(&self.defaults.granularity));
                let buckets = match resolve_window(&records, start, end) {
                    Some(window) => compute_timeline(&records, &window, granularity),
                    None => Vec::new(),
                };
                let message = if tabular {
                    self.format_timeline_table(&buckets)
                } else {
                    self.format_timeline(&buckets, granularity)
                };
                CommandResult::new(
                    CommandBasic::Timeline,
                    message,
                    Some(json!({ "granularity": granularity, "buckets": to_json(&buckets)? })),
                )
            }
            Command::Breakdown {
                x,
                y,
                size,
                group,
                start,
                end,
            } => {
                let records = self.store.load();
                let x_field = x.unwrap_or_else(|| self.defaults.x_axis.clone());
                let y_field = y.unwrap_or_else(|| self.defaults.y_axis.clone());
                let group_field = group.unwrap_or_else(|| self.defaults.breakdown.clone());
                let points = match resolve_window(&records, start, end) {
                    Some(window) => compute_breakdown(
                        &records,
                        &BreakdownRequest {
                            x_field: x_field.clone(),
                            y_field: y_field.clone(),
                            size_field: size,
                            group_field: group_field.clone(),
                            window,
                        },
                    ),
                    None => Vec::new(),
                };
                let message = if tabular {
                    self.format_breakdown_table(&points)
                } else {
                    format!(
                        "{} points (x: {}, y: {}, group: {})\n{}",
                        points.len(),
                        x_field,
                        y_field,
                        group_field,
                        points
                            .iter()
                            .map(|p| format!(
                                "Record {}: x={:.2}, y={:.2}, size={}, group={}",
                                p.id,
                                p.x,
                                p.y,
                                format_optional(p.size),
                                p.group.as_deref().unwrap_or("NULL")
                            ))
                            .collect::<Vec<_>>()
                            .join("\n")
                    )
                    .trim_end()
                    .to_string()
                };
                CommandResult::new(CommandBasic::Breakdown, message, Some(to_json(&points)?))
            }
            Command::Axes { exclude } => {
                let axes = axis_options(exclude.as_deref());
                let breakdowns = breakdown_options();
                let message = if tabular {
                    let mut builder = Builder::new();
                    builder.push_record(["Kind", "Value", "Label"]);
                    for option in &axes {
                        builder.push_record(["axis", option.value.as_str(), option.label.as_str()]);
                    }
                    for option in &breakdowns {
                        builder.push_record(["breakdown", option.value.as_str(), option.label.as_str()]);
                    }
                    builder.build().with(Style::ascii()).to_string()
                } else {
                    format!(
                        "Axes: {}\nBreakdowns: {}",
                        axes.iter()
                            .map(|o| o.value.as_str())
                            .collect::<Vec<_>>()
                            .join(", "),
                        breakdowns
                            .iter()
                            .map(|o| o.value.as_str())
                            .collect::<Vec<_>>()
                            .join(", ")
                    )
                };
                CommandResult::new(
                    CommandBasic::Axes,
                    message,
                    Some(json!({ "axes": to_json(&axes)?, "breakdowns": to_json(&breakdowns)? })),
                )
            }
            Command::Help { command } => {
                let help_text = match command {
                    Some(cmd) => COMMAND_HELP
                        .get(cmd.as_str())
                        .map(|help| self.format_command_help(help, format))
                        .transpose()?
                        .unwrap_or_else(|| {
                            format!("Unknown command: {}. Use HELP to see available commands.", cmd)
                        }),
                    None => self.format_general_help(format)?,
                };
                CommandResult::new(CommandBasic::Help, help_text, None)
            }
        };

        Ok(result)
    }

    /// Formats multiple command results according to the specified output format
    fn format_results(
        &self,
        results: &[CommandResult],
        format: OutputFormat,
    ) -> Result<String, String> {
        match format {
            OutputFormat::Standard => Ok(results
                .iter()
                .map(|r| r.message.clone())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::JSON => {
                let mut output = json!({
                    "results": results,
                    "count": results.len(),
                    "success": results.iter().all(|r| r.success),
                    "timestamp": chrono::Utc::now().to_rfc3339(),
                });
                if let Some(failed) = results.iter().find(|r| !r.success) {
                    output["error"] = json!(failed.message);
                }
                serde_json::to_string_pretty(&output).map_err(|e| e.to_string())
            }
            OutputFormat::Table if results.is_empty() => Ok("No results".to_string()),
            OutputFormat::Table => Ok(results
                .iter()
                .map(|r| match r.executed_command {
                    _ if !r.success => self.format_status_table(std::slice::from_ref(r)),
                    CommandBasic::Add | CommandBasic::NextId => {
                        self.format_status_table(std::slice::from_ref(r))
                    }
                    _ => r.message.clone(),
                })
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    /// Formats results as a status table showing success/failure of commands
    fn format_status_table(&self, results: &[CommandResult]) -> String {
        let status_results = results
            .iter()
            .map(|result| StatusTable {
                status: if result.success { "SUCCESS" } else { "ERROR" }.to_string(),
                message: result.message.clone(),
                timestamp: result.timestamp.clone(),
            })
            .collect::<Vec<_>>();

        Table::new(status_results).with(Style::ascii()).to_string()
    }

    fn format_overview(&self, overview: &Overview) -> String {
        format!(
            "Total orders: {}\nTotal sales: {:.2}\nTotal profit: {:.2}\nProfit ratio: {:.2}%\nOrder dates: {} to {}",
            overview.total_orders,
            overview.total_sales,
            overview.total_profit,
            overview.profit_ratio,
            format_date(overview.start_date),
            format_date(overview.end_date)
        )
    }

    fn format_overview_table(&self, overview: &Overview) -> String {
        let mut builder = Builder::new();
        builder.push_record(["Metric", "Value"]);
        builder.push_record(["Total orders".to_string(), overview.total_orders.to_string()]);
        builder.push_record(["Total sales".to_string(), format!("{:.2}", overview.total_sales)]);
        builder.push_record(["Total profit".to_string(), format!("{:.2}", overview.total_profit)]);
        builder.push_record(["Profit ratio".to_string(), format!("{:.2}%", overview.profit_ratio)]);
        builder.push_record(["Start date".to_string(), format_date(overview.start_date)]);
        builder.push_record(["End date".to_string(), format_date(overview.end_date)]);
        builder.build().with(Style::ascii()).to_string()
    }

    fn format_options(&self, options: &FilterOptions, tabular: bool) -> String {
        let lists = [
            ("Countries", &options.country_options),
            ("States", &options.state_options),
            ("Cities", &options.city_options),
            ("Categories", &options.category_options),
            ("Sub-categories", &options.sub_category_options),
        ];

        if tabular {
            let mut builder = Builder::new();
            builder.push_record(["Filter", "Options"]);
            for (label, values) in lists {
                builder.push_record([label.to_string(), values.join("\n")]);
            }
            return builder.build().with(Style::ascii()).to_string();
        }

        lists
            .iter()
            .map(|(label, values)| {
                if values.is_empty() {
                    format!("{}: (none)", label)
                } else {
                    format!("{}: {}", label, values.join(", "))
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn page_summary(&self, page: &Page) -> String {
        format!(
            "Page {} of {} ({} matching records)",
            page.page + 1,
            page.total_pages.max(1),
            page.total_rows
        )
    }

    fn format_page(&self, page: &Page) -> String {
        let mut lines = vec![self.page_summary(page)];
        lines.extend(page.rows.iter().map(|record| {
            let values = COLUMNS[1..]
                .iter()
                .filter_map(|column| {
                    record
                        .get_field(column.name)
                        .map(|v| format!("{}: {}", column.name, v))
                })
                .collect::<Vec<_>>()
                .join(", ");
            format!("Record {}: {{{}}}", record.id, values)
        }));
        lines.join("\n")
    }

    fn format_page_table(&self, page: &Page) -> String {
        let mut builder = Builder::new();
        builder.push_record(COLUMNS.iter().map(|c| c.name.to_string()));
        for record in &page.rows {
            builder.push_record(self.build_record_row(record));
        }

        let mut table = builder.build();
        table.with(Style::ascii());
        format!("{}\n{}", table, self.page_summary(page))
    }

    /// Builds a row of record data for table output
    fn build_record_row(&self, record: &OrderRecord) -> Vec<String> {
        COLUMNS
            .iter()
            .map(|column| {
                record
                    .get_field(column.name)
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| "NULL".to_string())
            })
            .collect()
    }

    fn format_timeline(&self, buckets: &[TimelineBucket], granularity: Granularity) -> String {
        let mut lines = vec![format!("{} {} buckets", buckets.len(), granularity.name())];
        lines.extend(buckets.iter().map(|b| {
            format!(
                "{}..{}: orders={}, sales={:.2}, profit={:.2}, profit_ratio={:.4}, discount={:.2}, quantity={}, days_to_ship={}",
                b.period_start,
                b.period_end,
                b.orders,
                b.sales,
                b.profit,
                b.profit_ratio,
                b.discount,
                b.quantity,
                b.days_to_ship
            )
        }));
        lines.join("\n")
    }

    fn format_timeline_table(&self, buckets: &[TimelineBucket]) -> String {
        let rows = buckets
            .iter()
            .map(|b| TimelineRow {
                period_start: b.period_start.to_string(),
                period_end: b.period_end.to_string(),
                orders: b.orders,
                sales: format!("{:.2}", b.sales),
                profit: format!("{:.2}", b.profit),
                profit_ratio: format!("{:.4}", b.profit_ratio),
                discount: format!("{:.2}", b.discount),
                quantity: b.quantity,
                days_to_ship: b.days_to_ship,
            })
            .collect::<Vec<_>>();

        Table::new(rows).with(Style::ascii()).to_string()
    }

    fn format_breakdown_table(&self, points: &[BreakdownPoint]) -> String {
        let rows = points
            .iter()
            .map(|p| BreakdownRow {
                id: p.id,
                x: format!("{:.2}", p.x),
                y: format!("{:.2}", p.y),
                size: format_optional(p.size),
                group: p.group.clone().unwrap_or_else(|| "NULL".to_string()),
            })
            .collect::<Vec<_>>();

        Table::new(rows).with(Style::ascii()).to_string()
    }

    /// Parses input string into a vector of commands
    fn parse_commands(&self, input: &str) -> Result<Vec<Command>, String> {
        let mut parsed_commands = Vec::new();

        for tokens in split_commands(input)? {
            let Some((name, args)) = tokens.split_first() else {
                continue;
            };

            let command = match name.to_uppercase().as_str() {
                "OVERVIEW" => Command::Overview,
                "OPTIONS" => self.parse_options(args)?,
                "TABLE" => self.parse_table(args)?,
                "NEXT_ID" => Command::NextId,
                "ADD" => self.parse_add(args)?,
                "TIMELINE" => self.parse_timeline(args)?,
                "BREAKDOWN" => self.parse_breakdown(args)?,
                "AXES" => self.parse_axes(args)?,
                "HELP" => self.parse_help(args.first().map(String::as_str))?,
                _ => return Err(format!("Unknown command: {}", name)),
            };

            parsed_commands.push(command);
        }

        Ok(parsed_commands)
    }

    fn parse_options(&self, args: &[String]) -> Result<Command, String> {
        let mut pairs = parse_pairs("OPTIONS", args, &OPTIONS_ARGS)?;
        Ok(Command::Options {
            selection: FilterSelection {
                country: take_value(&mut pairs, "country"),
                state: take_value(&mut pairs, "state"),
                category: take_value(&mut pairs, "category"),
            },
        })
    }

    fn parse_table(&self, args: &[String]) -> Result<Command, String> {
        let mut pairs = parse_pairs("TABLE", args, &TABLE_ARGS)?;

        let page = match take_number(&mut pairs, "page")? {
            Some(0) => return Err("Page numbers start at 1".to_string()),
            Some(page) => page - 1,
            None => 0,
        };

        Ok(Command::Table {
            filters: TableFilters {
                country: take_value(&mut pairs, "country"),
                state: take_value(&mut pairs, "state"),
                city: take_value(&mut pairs, "city"),
                category: take_value(&mut pairs, "category"),
                sub_category: take_value(&mut pairs, "sub_category"),
            },
            page,
            page_size: take_number(&mut pairs, "page_size")?,
        })
    }

    fn parse_add(&self, args: &[String]) -> Result<Command, String> {
        if args.is_empty() {
            return Err("Invalid ADD syntax. Expected: ADD field1=value1 [field2=value2 ...]".to_string());
        }
        let pairs = parse_pairs("ADD", args, &[])?;
        Ok(Command::Add {
            input: OrderRecordInput { values: pairs },
        })
    }

    fn parse_timeline(&self, args: &[String]) -> Result<Command, String> {
        let mut pairs = parse_pairs("TIMELINE", args, &TIMELINE_ARGS)?;
        Ok(Command::Timeline {
            start: take_date(&mut pairs, "start")?,
            end: take_date(&mut pairs, "end")?,
            granularity: take_value(&mut pairs, "granularity").map(|g| Granularity::parse(&g)),
        })
    }

    fn parse_breakdown(&self, args: &[String]) -> Result<Command, String> {
        let mut pairs = parse_pairs("BREAKDOWN", args, &BREAKDOWN_ARGS)?;
        Ok(Command::Breakdown {
            x: take_value(&mut pairs, "x"),
            y: take_value(&mut pairs, "y"),
            size: take_value(&mut pairs, "size"),
            group: take_value(&mut pairs, "group"),
            start: take_date(&mut pairs, "start")?,
            end: take_date(&mut pairs, "end")?,
        })
    }

    fn parse_axes(&self, args: &[String]) -> Result<Command, String> {
        let mut pairs = parse_pairs("AXES", args, &AXES_ARGS)?;
        Ok(Command::Axes {
            exclude: take_value(&mut pairs, "exclude"),
        })
    }

    fn parse_help(&self, command: Option<&str>) -> Result<Command, String> {
        let command = command.map(str::to_uppercase);
        if let Some(cmd) = &command {
            if !COMMAND_HELP.contains_key(cmd.as_str()) {
                return Err(format!(
                    "Unknown command: {}. Use HELP to see available commands.",
                    cmd
                ));
            }
        }
        Ok(Command::Help { command })
    }

    /// Formats help text according to the specified output format.
    fn format_command_help(&self, help: &CommandHelp, format: OutputFormat) -> Result<String, String> {
        match format {
            OutputFormat::Standard => Ok(format!(
                "Syntax: {}\n\nDescription:\n{}\n\nFlags:\n{}\n\nExamples:\n{}\n",
                help.syntax,
                help.description,
                help.flags
                    .iter()
                    .map(|(flag, desc)| format!("  {} - {}", flag, desc))
                    .collect::<Vec<_>>()
                    .join("\n"),
                help.examples
                    .iter()
                    .map(|ex| format!("  {}", ex))
                    .collect::<Vec<_>>()
                    .join("\n")
            )),
            OutputFormat::JSON => serde_json::to_string_pretty(&help).map_err(|e| e.to_string()),
            OutputFormat::Table => {
                let mut builder = Builder::new();
                builder.push_record(["Syntax", &help.syntax]);
                builder.push_record(["Description", &help.description]);

                let flags = help
                    .flags
                    .iter()
                    .map(|(flag, desc)| format!("{}: {}", flag, desc))
                    .collect::<Vec<_>>()
                    .join("\n");
                builder.push_record(["Flags", &flags]);

                let examples = help.examples.join("\n");
                builder.push_record(["Examples", &examples]);

                Ok(builder.build().with(Style::ascii()).to_string())
            }
        }
    }

    /// Formats the general help menu that lists all available commands.
    fn format_general_help(&self, format: OutputFormat) -> Result<String, String> {
        let mut commands: Vec<&str> = COMMAND_HELP.keys().copied().collect();
        commands.sort_unstable();

        match format {
            OutputFormat::Standard => Ok(get_general_help()),
            OutputFormat::JSON => serde_json::to_string_pretty(&commands).map_err(|e| e.to_string()),
            OutputFormat::Table => {
                let mut builder = Builder::new();
                builder.push_record(["Command", "Description"]);
                for cmd in commands {
                    if let Some(help) = COMMAND_HELP.get(cmd) {
                        builder.push_record([cmd, &*help.description]);
                    }
                }
                Ok(builder.build().with(Style::ascii()).to_string())
            }
        }
    }
}

/// Splits input into commands on bare `AND` tokens. Double quotes group a value
/// containing spaces and are dropped from the token.
fn split_commands(input: &str) -> Result<Vec<Vec<String>>, String> {
    let mut commands: Vec<Vec<String>> = vec![Vec::new()];
    let mut current = String::new();
    let mut in_quotes = false;
    let mut quoted = false;

    for c in input.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                quoted = true;
            }
            c if !in_quotes && (c.is_whitespace() || c.is_control()) => {
                flush(&mut commands, &mut current, &mut quoted);
            }
            c => current.push(c),
        }
    }

    if in_quotes {
        return Err("Unterminated quoted value".to_string());
    }
    flush(&mut commands, &mut current, &mut quoted);

    Ok(commands.into_iter().filter(|c| !c.is_empty()).collect())
}

fn flush(commands: &mut Vec<Vec<String>>, current: &mut String, quoted: &mut bool) {
    if current.is_empty() && !*quoted {
        return;
    }
    let token = std::mem::take(current);
    if !*quoted && token == "AND" {
        commands.push(Vec::new());
    } else if let Some(last) = commands.last_mut() {
        last.push(token);
    }
    *quoted = false;
}

/// Reads `key=value` arguments. An empty `allowed` list accepts any key.
fn parse_pairs(
    command: &str,
    args: &[String],
    allowed: &[&str],
) -> Result<BTreeMap<String, String>, String> {
    let mut pairs = BTreeMap::new();

    for arg in args {
        let (key, value) = arg.split_once('=').ok_or_else(|| {
            format!(
                "Invalid {} argument '{}'. Expected key=value",
                command, arg
            )
        })?;
        let key = key.trim().to_lowercase();

        if !allowed.is_empty() && !allowed.contains(&key.as_str()) {
            return Err(format!("Unknown {} argument '{}'", command, key));
        }
        if pairs.insert(key.clone(), value.to_string()).is_some() {
            return Err(format!("Duplicate {} argument '{}'", command, key));
        }
    }

    Ok(pairs)
}

// Blank values clear a control
fn take_value(pairs: &mut BTreeMap<String, String>, key: &str) -> Option<String> {
    pairs
        .remove(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn take_number(pairs: &mut BTreeMap<String, String>, key: &str) -> Result<Option<usize>, String> {
    take_value(pairs, key)
        .map(|v| {
            v.parse::<usize>()
                .map_err(|_| format!("Invalid {} '{}'. Expected a non-negative integer", key, v))
        })
        .transpose()
}

fn take_date(pairs: &mut BTreeMap<String, String>, key: &str) -> Result<Option<NaiveDate>, String> {
    take_value(pairs, key)
        .map(|v| {
            NaiveDate::parse_from_str(&v, "%Y-%m-%d")
                .map_err(|_| format!("Invalid {} date '{}'. Expected YYYY-MM-DD", key, v))
        })
        .transpose()
}

/// Fills a missing window bound from the snapshot's order dates.
/// `None` when a bound is missing and no record is dated.
fn resolve_window(
    records: &[OrderRecord],
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Option<DateWindow> {
    let dates = || records.iter().filter_map(|r| r.order_date);
    let start = start.or_else(|| dates().min())?;
    let end = end.or_else(|| dates().max())?;
    Some(DateWindow::new(start, end))
}

fn to_json<T: Serialize>(value: &T) -> Result<serde_json::Value, String> {
    serde_json::to_value(value).map_err(|e| e.to_string())
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.to_string())
        .unwrap_or_else(|| "NULL".to_string())
}

fn format_optional(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.2}", v))
        .unwrap_or_else(|| "NULL".to_string())
}
