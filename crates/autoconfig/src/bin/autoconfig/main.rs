mod cli;

use autoconfig::{BuildOptions, ConfigNode, Value};

fn main() {
    use clap::Parser;
    let cli = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("AUTOCONFIG_LOG"))
        .with_writer(std::io::stderr)
        .init();

    for new_path in cli.directory.iter() {
        match new_path.canonicalize() {
            Err(e) => {
                eprintln!(
                    "Failed to resolve path for -C/--directory {}\n{}",
                    new_path.display(),
                    e
                );
                std::process::exit(1);
            }
            Ok(cwd) => {
                if let Err(err) = std::env::set_current_dir(&cwd) {
                    eprintln!("Failed to set work directory to {}\n{}", cwd.display(), err,);
                    std::process::exit(1);
                }

                tracing::info!(directory=%cwd.display(), "Changed working directory");
            }
        }
    }

    let command_result = match cli.command {
        cli::Command::Show(show_cli) => show(show_cli),
        cli::Command::Get(get_cli) => get(get_cli),
        cli::Command::Diff(diff_cli) => diff(diff_cli),
        cli::Command::Template(template_cli) => template(template_cli),
    };

    if let Err(e) = command_result {
        for error in e.chain() {
            eprintln!("{error}")
        }
        std::process::exit(1);
    }
}

pub fn show(cli: cli::ShowCommand) -> anyhow::Result<()> {
    let node = load(&cli.input)?;
    output(&cli.output, &Value::Node(node))
}

pub fn get(cli: cli::GetCommand) -> anyhow::Result<()> {
    let node = load(&cli.input)?;
    let value = node.get(cli.path.as_str())?;
    output(&cli.output, value)
}

pub fn diff(cli: cli::DiffCommand) -> anyhow::Result<()> {
    let diff = autoconfig::diff::diff_files(&cli.a, &cli.b)?;
    print!("{diff}");
    Ok(())
}

pub fn template(cli: cli::TemplateCommand) -> anyhow::Result<()> {
    use clap::CommandFactory;

    let specs = autoconfig::template::specs_from_command(&cli::ShowCommand::command());
    let path = autoconfig::template::export_template(&specs, &cli.destination)?;
    println!("YAML file written to: {}", path.display());
    Ok(())
}

fn load(input: &cli::InputArgs) -> anyhow::Result<ConfigNode> {
    let options = BuildOptions {
        subset: input.subset.clone(),
        local_subsets: input.local,
        verbose: true,
    };

    let mut node = ConfigNode::from_path(&input.file, &options)?;
    if input.reuse {
        let report = autoconfig::reuse::Resolver::default().resolve_in_place(&mut node);
        tracing::debug!(?report, "reuse");
    }

    Ok(node)
}

fn output(output: &cli::OutputArgs, value: &Value) -> anyhow::Result<()> {
    match output.format {
        cli::OutputFormat::Document => match value {
            Value::Node(node) => print!("{node}"),
            other => println!("{other}"),
        },
        cli::OutputFormat::Yaml => serde_yaml::to_writer(std::io::stdout(), value)?,
        cli::OutputFormat::Json => {
            serde_json::to_writer_pretty(std::io::stdout(), value)?;
            println!();
        }
    };

    Ok(())
}
