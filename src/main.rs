use clap::Parser;
use anyhow::Result;

use foldercomp::{
    cli::{Cli, Command, CompareOutput, DiffOutputFormat},
    config::FolderCompConfig,
    diff::{DiffConfig, DiffFormatter, DiffMode, DiffOutput},
    EqualityOracle, FileNode, NodeStatus, TreeComparator,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(err) = cli.validate() {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }

    cli.setup_logging();

    let config = cli.load_config()?;

    match &cli.command {
        Command::Compare {
            left,
            right,
            output,
            hide_same,
            ..
        } => {
            tracing::debug!("Using configuration: {:?}", config.compare);
            let tree = run_compare(&config, left, right)?;
            let tree = if *hide_same { tree.without_same() } else { tree };

            match output {
                CompareOutput::Tree => print_tree(&tree, 0, cli.no_color),
                CompareOutput::Json => println!("{}", serde_json::to_string_pretty(&tree)?),
                CompareOutput::Summary => print_summary(&tree),
            }
        }
        Command::Diff {
            left,
            right,
            mode,
            output,
            ..
        } => {
            let generator = DiffConfig::new()
                .algorithm(config.diff.algorithm)
                .context_lines(config.diff.context_lines)
                .build();
            let result = generator.diff_files(left, right, *mode)?;

            match output {
                DiffOutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
                DiffOutputFormat::Text => print_diff(&result, config.diff.width, cli.no_color),
            }
        }
    }

    Ok(())
}

fn run_compare(config: &FolderCompConfig, left: &std::path::Path, right: &std::path::Path) -> Result<FileNode> {
    let comparator = TreeComparator::new(config.compare.exclusion_filter()?)
        .with_oracle(EqualityOracle::new(config.compare.hash_buffer_size));
    Ok(comparator.compare(left, right)?)
}

fn print_tree(node: &FileNode, depth: usize, no_color: bool) {
    let marker = match node.status {
        NodeStatus::Same => " ",
        NodeStatus::Added => "+",
        NodeStatus::Removed => "-",
        NodeStatus::Modified => "!",
    };

    let name = if depth == 0 {
        match (&node.left_name, &node.right_name) {
            (Some(l), Some(r)) if l != r => format!("{} <> {}", l, r),
            _ => node.name.clone(),
        }
    } else if node.is_dir() {
        format!("{}/", node.name)
    } else {
        node.name.clone()
    };

    let indent = "  ".repeat(depth);
    if no_color {
        println!("{} {}{}", marker, indent, name);
    } else {
        let color = match node.status {
            NodeStatus::Same => "\x1b[0m",
            NodeStatus::Added => "\x1b[32m",    // Green
            NodeStatus::Removed => "\x1b[31m",  // Red
            NodeStatus::Modified => "\x1b[33m", // Yellow
        };
        println!("{}{} {}{}\x1b[0m", color, marker, indent, name);
    }

    for child in node.children() {
        print_tree(child, depth + 1, no_color);
    }
}

fn print_summary(tree: &FileNode) {
    let stats = tree.stats();
    println!(
        "!{} +{} -{} ={}",
        stats.modified, stats.added, stats.removed, stats.same
    );
}

fn print_diff(result: &DiffOutput, width: usize, no_color: bool) {
    if result.mode == DiffMode::Raw {
        println!("--- Left");
        println!("{}", result.left_content.as_deref().unwrap_or_default());
        println!("+++ Right");
        println!("{}", result.right_content.as_deref().unwrap_or_default());
        return;
    }

    if let Some(diff) = &result.diff {
        for line in diff {
            if no_color || line.starts_with("---") || line.starts_with("+++") {
                println!("{}", line);
            } else if line.starts_with('+') {
                println!("\x1b[32m{}\x1b[0m", line);
            } else if line.starts_with('-') {
                println!("\x1b[31m{}\x1b[0m", line);
            } else if line.starts_with("@@") {
                println!("\x1b[36m{}\x1b[0m", line);
            } else {
                println!("{}", line);
            }
        }
    }

    if let Some(rows) = &result.side_by_side {
        if result.diff.is_some() {
            println!();
        }
        println!("{}", DiffFormatter::render_columns(rows, width));
    }

    if let Some(stats) = &result.stats {
        println!();
        println!("+{} -{} in {} group(s)", stats.added, stats.removed, stats.groups);
    }
}
