use clap::{Parser, Subcommand};
use prefill::prelude::*;
use prefill::source::source_type;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Inspect intake form dependencies and configure prefill mappings
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the blueprint graph JSON file
    graph_path: PathBuf,

    /// Path to the mapping document
    #[arg(short, long, default_value = "prefill-mappings.json")]
    mappings: PathBuf,

    /// Query string of the current request, e.g. "ref=mail&lang=en"
    #[arg(short, long, default_value = "")]
    query: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the forms of the graph
    Forms,
    /// Show the direct and transitive dependencies of a form
    Deps { form: String },
    /// Show the fields of a form and their prefill configuration
    Fields { form: String },
    /// List every candidate data source for a form
    Sources {
        form: String,
        /// Print the groups as JSON
        #[arg(long)]
        json: bool,
    },
    /// Bind a field to a data source, e.g. `map f2 email form_field:f1.email`
    Map {
        form: String,
        field: String,
        /// `<source type>:<source id>`; the type defaults to `form_field`
        source: String,
        /// Commit even when the types do not match
        #[arg(long)]
        force: bool,
    },
    /// Remove the prefill mapping of a field
    Unmap { form: String, field: String },
    /// Resolve the configured value of a field
    Resolve { form: String, field: String },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let graph_json = std::fs::read_to_string(&cli.graph_path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to read graph file '{}': {}",
            cli.graph_path.display(),
            e
        ))
    });
    let graph = GraphModel::from_json_str(&graph_json)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load graph: {}", e)));
    TracingNotifier.notify("Patient intake forms loaded successfully", Severity::Success);

    let request = RequestContext::from_query(&cli.query);
    let registry = SourceRegistry::default();
    let mut manager = PrefillManager::builder(Box::new(JsonFilePersistence::new(&cli.mappings)))
        .open()
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load saved mappings: {}", e)));

    match cli.command {
        Command::Forms => print_forms(&graph),
        Command::Deps { form } => print_dependencies(&graph, find_form(&graph, &form)),
        Command::Fields { form } => print_fields(&graph, &manager, find_form(&graph, &form)),
        Command::Sources { form, json } => {
            let ctx = SourceContext::new(&graph, find_form(&graph, &form), &request);
            let groups = registry.enumerate_all(&ctx, manager.notifier());
            if json {
                let out = serde_json::to_string_pretty(&groups)
                    .unwrap_or_else(|e| exit_with_error(&format!("Failed to encode sources: {}", e)));
                println!("{}", out);
            } else {
                let types: Vec<&str> = registry.source_types().collect();
                println!("Source types: {}", types.join(", "));
                print_sources(&groups);
            }
        }
        Command::Map {
            form,
            field,
            source,
            force,
        } => {
            let (tag, id) = source
                .split_once(':')
                .unwrap_or((source_type::FORM_FIELD, source.as_str()));
            let ctx = SourceContext::new(&graph, find_form(&graph, &form), &request);
            let candidate = registry
                .find_source(&ctx, manager.notifier(), tag, id)
                .unwrap_or_else(|| exit_with_error(&format!("Unknown source '{}:{}'", tag, id)));

            let result = configure(&mut manager, &graph, &form, &field, candidate, force);
            match result {
                Ok(SaveOutcome::Committed(mapping)) => {
                    println!("Saved: {}.{} {}", form, field, mapping.source.display())
                }
                Ok(SaveOutcome::NeedsConfirmation(warnings)) => {
                    println!("Warning: {}", warnings.join(", "));
                    println!("Run again with --force to proceed anyway.");
                }
                Err(e) => exit_with_error(&format!("Failed to save prefill mapping: {}", e)),
            }
        }
        Command::Unmap { form, field } => match manager.remove(&form, &field) {
            Some(_) => println!("Removed prefill mapping for {}.{}", form, field),
            None => println!("No prefill mapping for {}.{}", form, field),
        },
        Command::Resolve { form, field } => {
            let mapping = manager.mapping(&form, &field).unwrap_or_else(|| {
                exit_with_error(&format!("No prefill mapping for {}.{}", form, field))
            });
            let ctx = SourceContext::new(&graph, find_form(&graph, &form), &request);
            match registry.resolve(mapping, &ctx) {
                Some(resolved) => println!(
                    "{}.{} = {}",
                    form,
                    field,
                    resolved.value.as_deref().unwrap_or("(no value)")
                ),
                None => println!("{}.{}: unknown source type '{}'", form, field, mapping.source_type()),
            }
        }
    }
}

fn configure(
    manager: &mut PrefillManager,
    graph: &GraphModel,
    form: &str,
    field: &str,
    candidate: DataSource,
    force: bool,
) -> Result<SaveOutcome, LifecycleError> {
    manager.select_form(form);
    manager.begin_configure(field)?;
    manager.select_candidate(candidate)?;
    let outcome = manager.save_in(graph)?;
    match outcome {
        SaveOutcome::NeedsConfirmation(_) if force => manager.save_in(graph),
        other => Ok(other),
    }
}

fn find_form<'g>(graph: &'g GraphModel, id: &str) -> &'g FormNode {
    graph
        .node(id)
        .unwrap_or_else(|| exit_with_error(&format!("Form '{}' not found", id)))
}

fn print_forms(graph: &GraphModel) {
    println!("--- Intake Forms ---");
    let mut any = false;
    for form in graph.forms() {
        any = true;
        println!(
            "{:<40} {} ({} dependencies)",
            form.id,
            form.name,
            form.prerequisites.len()
        );
    }
    if !any {
        println!("No forms available");
    }
}

fn print_dependencies(graph: &GraphModel, form: &FormNode) {
    let deps = graph.dependencies(&form.id);
    println!("--- Dependencies of {} ---", form.name);
    println!("Direct ({}):", deps.direct.len());
    for dep in &deps.direct {
        println!("  - {} ({})", dep.name, dep.id);
    }
    println!("Transitive ({}):", deps.transitive.len());
    for dep in &deps.transitive {
        println!("  - {} ({})", dep.name, dep.id);
    }
}

fn print_fields(graph: &GraphModel, manager: &PrefillManager, form: &FormNode) {
    let fields = graph.fields_of(form);
    println!("--- Fields of {} ---", form.name);
    if fields.is_empty() {
        println!("No fields found for this form");
        return;
    }
    for field in fields {
        let required = if field.required { " *" } else { "" };
        let prefill = manager
            .display(&form.id, &field.id)
            .unwrap_or_else(|| "(not configured)".to_string());
        println!(
            "{:<24} {:<16} {}{}",
            field.id, field.field_type, prefill, required
        );
    }
}

fn print_sources(groups: &[SourceGroup]) {
    if groups.iter().all(|g| g.sources.is_empty()) {
        println!("No data sources available");
        return;
    }
    for group in groups.iter().filter(|g| !g.sources.is_empty()) {
        println!("--- {} ({}) ---", group.name, group.source_type);
        for source in &group.sources {
            let ty = source.field_type().unwrap_or("?");
            println!(
                "  {:<32} {:<40} [{}] {}",
                source.id, source.display_name, ty, source.category
            );
        }
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
