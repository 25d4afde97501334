use std::collections::HashMap;

use lazy_static::lazy_static;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct CommandHelp {
    pub syntax: String,
    pub description: String,
    pub examples: Vec<String>,
    pub flags: Vec<(String, String)>,
}

fn flag(name: &str, description: &str) -> (String, String) {
    (name.to_string(), description.to_string())
}

fn window_flags() -> Vec<(String, String)> {
    vec![
        flag(
            "start=<YYYY-MM-DD>",
            "First order date included (defaults to the earliest order)",
        ),
        flag(
            "end=<YYYY-MM-DD>",
            "Last order date included (defaults to the latest order)",
        ),
    ]
}

lazy_static! {
    pub static ref COMMAND_HELP: HashMap<&'static str, CommandHelp> = {
        let mut m = HashMap::new();

        m.insert(
            "OVERVIEW",
            CommandHelp {
                syntax: "OVERVIEW".to_string(),
                description: "Shows total orders, sales, profit, profit ratio and the order date range"
                    .to_string(),
                examples: vec!["OVERVIEW".to_string()],
                flags: vec![],
            },
        );

        m.insert(
            "OPTIONS",
            CommandHelp {
                syntax: "OPTIONS [country=<value>] [state=<value>] [category=<value>]".to_string(),
                description: "Lists the values available in each cascading table filter".to_string(),
                examples: vec![
                    "OPTIONS".to_string(),
                    r#"OPTIONS country="United States" state=Texas"#.to_string(),
                ],
                flags: vec![
                    flag("country=<value>", "Narrows the state and city options"),
                    flag("state=<value>", "Narrows the city options"),
                    flag("category=<value>", "Narrows the sub-category options"),
                ],
            },
        );

        m.insert(
            "TABLE",
            CommandHelp {
                syntax: "TABLE [country=..] [state=..] [city=..] [category=..] [sub_category=..] [page=N] [page_size=N]"
                    .to_string(),
                description: "Shows one page of order records matching every given filter, newest first"
                    .to_string(),
                examples: vec![
                    "TABLE".to_string(),
                    "TABLE category=Technology page=2".to_string(),
                    r#"TABLE city="New York City" page_size=25"#.to_string(),
                ],
                flags: vec![
                    flag("country=<value>", "Exact country/region"),
                    flag("state=<value>", "Exact state/province"),
                    flag("city=<value>", "Exact city"),
                    flag("category=<value>", "Exact category"),
                    flag("sub_category=<value>", "Exact sub-category"),
                    flag("page=<N>", "Page number, starting at 1"),
                    flag("page_size=<N>", "Rows per page (defaults to the configured size)"),
                ],
            },
        );

        m.insert(
            "TIMELINE",
            CommandHelp {
                syntax: "TIMELINE [start=YYYY-MM-DD] [end=YYYY-MM-DD] [granularity=<unit>]".to_string(),
                description: "Sums every numeric column per calendar period within the date window"
                    .to_string(),
                examples: vec![
                    "TIMELINE".to_string(),
                    "TIMELINE start=2021-01-01 end=2021-12-31 granularity=QE".to_string(),
                ],
                flags: {
                    let mut flags = window_flags();
                    flags.push(flag(
                        "granularity=<unit>",
                        "day, week, month, quarter or year (also D, W, ME, QE, YE)",
                    ));
                    flags
                },
            },
        );

        m.insert(
            "BREAKDOWN",
            CommandHelp {
                syntax: "BREAKDOWN [x=<field>] [y=<field>] [size=<field>] [group=<field>] [start=..] [end=..]"
                    .to_string(),
                description: "Plots one point per order within the date window".to_string(),
                examples: vec![
                    "BREAKDOWN".to_string(),
                    "BREAKDOWN x=discount y=profit_ratio group=segment".to_string(),
                ],
                flags: {
                    let mut flags = vec![
                        flag("x=<field>", "Numeric field on the horizontal axis"),
                        flag("y=<field>", "Numeric field on the vertical axis"),
                        flag("size=<field>", "Numeric field sizing each point (defaults to quantity)"),
                        flag("group=<field>", "Categorical field coloring each point"),
                    ];
                    flags.extend(window_flags());
                    flags
                },
            },
        );

        m.insert(
            "AXES",
            CommandHelp {
                syntax: "AXES [exclude=<field>]".to_string(),
                description: "Lists the numeric axis fields and the breakdown groups".to_string(),
                examples: vec!["AXES".to_string(), "AXES exclude=sales".to_string()],
                flags: vec![flag("exclude=<field>", "Field selected on the other axis")],
            },
        );

        m.insert(
            "NEXT_ID",
            CommandHelp {
                syntax: "NEXT_ID".to_string(),
                description: "Shows the id the next added record will receive".to_string(),
                examples: vec!["NEXT_ID".to_string()],
                flags: vec![],
            },
        );

        m.insert(
            "ADD",
            CommandHelp {
                syntax: "ADD field1=value1 [field2=value2 ...]".to_string(),
                description: "Appends a new order record. Every field except id is required"
                    .to_string(),
                examples: vec![
                    r#"ADD order_id=CA-2024-100001 order_date=2024-01-02 dispatch_date=2024-01-05 delivery_mode="Standard Class" ..."#
                        .to_string(),
                ],
                flags: vec![flag(
                    "<field>=<value>",
                    "Dates as YYYY-MM-DD, quantity as an integer, sales/discount/profit as numbers",
                )],
            },
        );

        m.insert(
            "HELP",
            CommandHelp {
                syntax: "HELP [command]".to_string(),
                description: "Shows help information for all commands or a specific command"
                    .to_string(),
                examples: vec!["HELP".to_string(), "HELP TIMELINE".to_string()],
                flags: vec![],
            },
        );

        m
    };
}

pub fn get_general_help() -> String {
    "Available commands:\n\
     OVERVIEW  - Summary KPIs of every order\n\
     OPTIONS   - Values available in the table filters\n\
     TABLE     - Filtered, paginated order records\n\
     TIMELINE  - Column sums per calendar period\n\
     BREAKDOWN - One point per order for the bubble chart\n\
     AXES      - Fields selectable on the chart axes\n\
     NEXT_ID   - Id of the next added record\n\
     ADD       - Append a new order record\n\
     \n\
     Commands may be chained with AND.\n\
     Use 'HELP <command>' for detailed information about a specific command."
        .to_string()
}
