//! # dtx
//!
//! Command-line front end for the data-type explorer core.
//!
//! ```text
//! dtx classify user.json
//! dtx op user.json --target settings_map.visits_counter --operation increment --step 3
//! dtx op user.json --target settings_map --operation removeField --field old_flag
//! dtx op tags.json --data-type set --operation addElement --element rust
//! dtx demo
//! ```
//!
//! Payload files hold either the raw value (`{"a_counter": 1}`, `5`,
//! `["x"]`) or a fetch body (`{"type": "map", "value": {...}}`).

use std::collections::BTreeSet;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::*;
use dtx_client::{ClientConfig, ExplorerClient, HttpResponse, Method};
use dtx_core::{Counter, FieldId, FieldTree, FieldType, FieldValue};
use dtx_ops::{
    build_operation, DataTypeKind, DataTypeObject, DataTypeValue, Operand, OperationDocument,
    OperationType,
};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

type CliResult<T> = Result<T, Box<dyn Error>>;

// ─── CLI ───────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "dtx")]
#[command(about = "Classify CRDT data-type payloads and build update operations")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the classified field tree of a map payload
    Classify {
        /// Payload file
        file: PathBuf,
    },
    /// Print the update operation for a mutation
    Op {
        /// Payload file
        file: PathBuf,
        /// Data type declared by the bucket type (counter, set or map)
        #[arg(long, default_value = "map")]
        data_type: String,
        /// Operation name (increment, decrement, addElement, removeElement, addField, editField, removeField)
        #[arg(long)]
        operation: String,
        /// Dot path of the target field inside a map; the top-level map when omitted
        #[arg(long)]
        target: Option<String>,
        /// Set element for addElement/removeElement
        #[arg(long)]
        element: Option<String>,
        /// Field name for addField/removeField, relative to the target map
        #[arg(long)]
        field: Option<String>,
        /// JSON value for addField/editField
        #[arg(long)]
        value: Option<String>,
        /// Counter step for increment/decrement
        #[arg(long)]
        step: Option<i64>,
    },
    /// Walk through fetch and update against an in-memory explorer API
    Demo,
}

// ─── Pretty printing ──────────────────────────────────────────────────────

fn header(text: &str) {
    let bar = "═".repeat(60);
    println!("\n{}", bar.bright_cyan());
    println!("  {}", text.bold().bright_white());
    println!("{}", bar.bright_cyan());
}

fn section(text: &str) {
    println!("\n{} {}", "▸".bright_yellow(), text.bold());
}

fn step(text: &str) {
    println!("  {} {}", "•".bright_green(), text);
}

fn describe(value: &FieldValue) -> String {
    match value {
        FieldValue::Counter(c) => c.value.to_string(),
        FieldValue::Flag(b) => b.to_string(),
        FieldValue::Register(s) => format!("{:?}", s),
        FieldValue::Set(items) => format!("{:?}", items),
        FieldValue::Map(fields) => format!("{} fields", fields.len()),
    }
}

fn show_tree(tree: &FieldTree, map: FieldId, indent: usize) -> CliResult<()> {
    let fields = tree.fields_of(map)?;
    for kind in FieldType::ALL {
        let bucket = fields.bucket(kind);
        if bucket.is_empty() {
            continue;
        }
        println!("{}{}", "  ".repeat(indent + 1), kind.bucket_name().bright_yellow());
        for (name, id) in bucket {
            let record = tree.get(*id)?;
            println!(
                "{}{} = {}",
                "  ".repeat(indent + 2),
                name.bright_magenta(),
                describe(&record.value)
            );
            if kind == FieldType::Map {
                show_tree(tree, *id, indent + 2)?;
            }
        }
    }
    Ok(())
}

// ─── Payload loading ──────────────────────────────────────────────────────

/// Unwrap a fetch body to its value; raw values pass through.
fn payload_value(raw: Value) -> Value {
    match raw {
        Value::Object(mut object) if object.contains_key("type") && object.contains_key("value") => {
            object.remove("value").unwrap_or(Value::Null)
        }
        other => other,
    }
}

fn load(file: &Path) -> CliResult<Value> {
    let text = fs::read_to_string(file)?;
    Ok(payload_value(serde_json::from_str(&text)?))
}

fn key_of(file: &Path) -> String {
    file.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "object".to_string())
}

fn load_object(file: &Path, data_type: &str) -> CliResult<DataTypeObject> {
    object_from_value(key_of(file), data_type, load(file)?)
}

fn object_from_value(key: String, data_type: &str, value: Value) -> CliResult<DataTypeObject> {
    let kind: DataTypeKind = data_type.parse()?;
    let value = match kind {
        DataTypeKind::Counter => DataTypeValue::Counter(Counter::new(
            value.as_i64().ok_or("counter payload must be an integer")?,
        )),
        DataTypeKind::Set => {
            let items = value.as_array().ok_or("set payload must be an array")?;
            let elements = items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| format!("set element {} is not a string", item))
                })
                .collect::<Result<BTreeSet<String>, _>>()?;
            DataTypeValue::Set(elements)
        }
        DataTypeKind::Map => {
            let object = value.as_object().ok_or("map payload must be an object")?;
            DataTypeValue::Map(FieldTree::from_payload(key.clone(), object)?)
        }
    };
    Ok(DataTypeObject::new("cli", "cli", key, value).with_data_type(data_type))
}

// ─── Commands ─────────────────────────────────────────────────────────────

fn run_classify(file: &Path) -> CliResult<()> {
    let value = load(file)?;
    let object = value.as_object().ok_or("map payload must be an object")?;
    let tree = FieldTree::from_payload(key_of(file), object)?;

    let root = tree.get(tree.root())?;
    println!("{} {}", "map".bright_cyan(), root.name.bold());
    show_tree(&tree, tree.root(), 0)?;

    let dropped: Vec<&String> = object
        .keys()
        .filter(|k| FieldType::from_field_name(k).is_none())
        .collect();
    if !dropped.is_empty() {
        println!(
            "{} {:?}",
            "unclassified top-level keys:".dimmed(),
            dropped
        );
    }
    Ok(())
}

struct OpArgs {
    data_type: String,
    operation: String,
    target: Option<String>,
    element: Option<String>,
    field: Option<String>,
    value: Option<String>,
    step: Option<i64>,
}

fn run_op(file: &Path, args: OpArgs) -> CliResult<()> {
    let mut object = load_object(file, &args.data_type)?;
    let document = build_op(&mut object, &args)?;
    println!("{}", document.encode()?);
    Ok(())
}

/// Apply the requested edit to the loaded object and build its operation.
fn build_op(object: &mut DataTypeObject, args: &OpArgs) -> CliResult<OperationDocument> {
    let operation: OperationType = args.operation.parse()?;

    if let (DataTypeValue::Counter(counter), Some(by)) = (&mut object.value, args.step) {
        *counter = counter.with_steps(by, by);
    }

    let mut target = None;
    let mut operand = args.element.clone().map(Operand::Element);

    if let Some(tree) = object.tree_mut() {
        let target_id = tree.find_path(args.target.as_deref().unwrap_or(""))?;
        target = Some(target_id);

        if let Some(by) = args.step {
            tree.set_counter_step(target_id, by, by)?;
        }

        let raw = args.value.as_deref().map(serde_json::from_str::<Value>).transpose()?;
        match operation {
            OperationType::AddField => {
                let name = args.field.as_deref().ok_or("addField needs --field")?;
                let raw = raw.ok_or("addField needs --value")?;
                operand = Some(Operand::Field(tree.insert_field(target_id, name, &raw)?));
            }
            OperationType::EditField => {
                if let Some(raw) = raw {
                    tree.set_value(target_id, &raw)?;
                }
                operand = Some(Operand::Field(target_id));
            }
            OperationType::RemoveField => {
                let name = args.field.as_deref().ok_or("removeField needs --field")?;
                let field = tree
                    .child(target_id, name)?
                    .ok_or_else(|| format!("no field {} under the target", name))?;
                operand = Some(Operand::Field(field));
            }
            _ => {}
        }
    }

    Ok(build_operation(object, target, operation, operand.as_ref())?)
}

async fn run_demo() -> CliResult<()> {
    header("DEMO: Fetch, classify and update a nested map");

    let client = ExplorerClient::new_with_memory_transport(ClientConfig::default());
    let url = client.data_type_url("maps", "users", "ann");
    client.transport().respond(
        Method::Get,
        url.clone(),
        HttpResponse::new(
            200,
            r#"{"type":"map","value":{
                "logins_counter": 12,
                "settings_map": {
                    "theme_register": "light",
                    "profile_map": {"page_visits_counter": 1, "badges_set": ["early"]}
                },
                "legacy": "ignored"
            }}"#,
        ),
    );
    client
        .transport()
        .respond(Method::Post, url.clone(), HttpResponse::new(204, ""));

    section("Phase 1: Fetch and classify");
    let mut object = client.fetch_object("maps", "users", "ann", "map").await?;
    step(&format!("GET {}", url));
    if let Some(tree) = object.tree() {
        show_tree(tree, tree.root(), 0)?;
    }

    section("Phase 2: Mutations");
    let tree = object.tree_mut().ok_or("demo object is a map")?;
    let visits = tree.find_path("settings_map.profile_map.page_visits_counter")?;
    let badges = tree.find_path("settings_map.profile_map.badges_set")?;
    let profile = tree.find_path("settings_map.profile_map")?;
    let theme = tree.find_path("settings_map.theme_register")?;
    tree.set_value(theme, &Value::String("dark".into()))?;
    let verified = tree.insert_field(profile, "verified_flag", &Value::Bool(true))?;

    let mutations: Vec<(&str, Option<FieldId>, OperationType, Option<Operand>)> = vec![
        ("increment visits", Some(visits), OperationType::Increment, None),
        (
            "add badge",
            Some(badges),
            OperationType::AddElement,
            Some(Operand::Element("veteran".into())),
        ),
        ("edit theme", Some(theme), OperationType::EditField, Some(Operand::Field(theme))),
        (
            "add verified",
            Some(profile),
            OperationType::AddField,
            Some(Operand::Field(verified)),
        ),
        (
            "remove badges",
            Some(profile),
            OperationType::RemoveField,
            Some(Operand::Field(badges)),
        ),
    ];

    for (label, target, operation, operand) in mutations {
        let sent = client.update(&object, target, operation, operand.as_ref()).await?;
        step(&format!("{:<16} POST {}", label, sent.encode()?.bright_green()));
    }

    section("Phase 3: Rejected request");
    match client.update_named(&object, None, "explode", None).await {
        Ok(_) => step("unexpectedly accepted"),
        Err(e) => step(&format!("{} {}", "rejected:".bright_red(), e)),
    }
    step(&format!(
        "{} requests reached the transport",
        client.transport().requests().len()
    ));
    Ok(())
}

// ─── Main ─────────────────────────────────────────────────────────────────

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Classify { file } => run_classify(&file),
        Commands::Op {
            file,
            data_type,
            operation,
            target,
            element,
            field,
            value,
            step,
        } => run_op(
            &file,
            OpArgs {
                data_type,
                operation,
                target,
                element,
                field,
                value,
                step,
            },
        ),
        Commands::Demo => run_demo().await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "error:".bright_red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_value_unwraps_fetch_body() {
        let body = json!({"type": "map", "value": {"a_flag": true}});
        assert_eq!(payload_value(body), json!({"a_flag": true}));
        assert_eq!(payload_value(json!(5)), json!(5));
        // A map that merely has a `type` field is left alone.
        assert_eq!(payload_value(json!({"type": 1})), json!({"type": 1}));
    }

    fn op_args(operation: &str, target: &str) -> OpArgs {
        OpArgs {
            data_type: "map".into(),
            operation: operation.into(),
            target: Some(target.into()),
            element: None,
            field: None,
            value: None,
            step: None,
        }
    }

    fn map_object() -> DataTypeObject {
        let payload = json!({"settings_map": {"theme_register": "light", "profile_map": {}}});
        object_from_value("user".into(), "map", payload).unwrap()
    }

    #[test]
    fn test_add_field_into_nested_map() {
        let mut object = map_object();
        let args = OpArgs {
            field: Some("new_flag".into()),
            value: Some("true".into()),
            ..op_args("addField", "settings_map")
        };
        let document = build_op(&mut object, &args).unwrap();
        assert_eq!(
            document.encode().unwrap(),
            r#"{"update":{"settings_map":{"update":{"new_flag":true}}}}"#
        );

        let mut object = map_object();
        let args = OpArgs {
            field: Some("seen_counter".into()),
            value: Some("2".into()),
            ..op_args("addField", "settings_map.profile_map")
        };
        let document = build_op(&mut object, &args).unwrap();
        assert_eq!(
            document.encode().unwrap(),
            r#"{"update":{"settings_map":{"update":{"profile_map":{"update":{"seen_counter":2}}}}}}"#
        );
    }

    #[test]
    fn test_remove_field_from_nested_map() {
        let mut object = map_object();
        let args = OpArgs {
            field: Some("theme_register".into()),
            ..op_args("removeField", "settings_map")
        };
        let document = build_op(&mut object, &args).unwrap();
        assert_eq!(
            document.encode().unwrap(),
            r#"{"update":{"settings_map":{"remove":"theme_register"}}}"#
        );
    }

    #[test]
    fn test_set_payload_rejects_non_string_elements() {
        let object = object_from_value("tags".into(), "set", json!(["a", "b"])).unwrap();
        assert_eq!(object.value, DataTypeValue::Set(["a", "b"].iter().map(|s| s.to_string()).collect()));

        assert!(object_from_value("tags".into(), "set", json!(["a", 1])).is_err());
    }

    #[test]
    fn test_describe() {
        assert_eq!(describe(&FieldValue::Flag(true)), "true");
        assert_eq!(describe(&FieldValue::Counter(Counter::new(4))), "4");
    }
}
