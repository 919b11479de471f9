use std::time::Duration;

use algotrace::avl::AvlTree;
use algotrace::huffman::{forest, HuffmanCoder};
use algotrace::{
    BinarySearchTree, Domain, DynamicArray, EngineConfig, PlaybackSchedule, StepEvent, Trace,
    TraversalOrder, Value,
};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "algotrace",
    about = "Run one data-structure operation and print every recorded step"
)]
struct Cli {
    /// Log engine decisions at debug level (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Print the structure snapshot carried by each step.
    #[arg(long, global = true)]
    snapshots: bool,
    /// Replace every per-domain playback interval (milliseconds).
    #[arg(long, global = true)]
    interval_ms: Option<u64>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Insert into a dynamic array, shifting elements right.
    ArrayInsert {
        /// Initial contents, comma separated.
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        values: Vec<Value>,
        /// Insert position (0..=len).
        #[arg(long)]
        index: usize,
        /// Value to insert.
        #[arg(long, allow_hyphen_values = true)]
        value: Value,
        /// Slots reserved before the initial values are pushed.
        #[arg(long)]
        capacity: Option<usize>,
    },
    /// Delete from a dynamic array, shifting elements left.
    ArrayDelete {
        /// Initial contents, comma separated.
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        values: Vec<Value>,
        /// Position to delete (0..len).
        #[arg(long)]
        index: usize,
    },
    /// Search a binary search tree.
    BstSearch {
        /// Values inserted in order, comma separated.
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        values: Vec<Value>,
        /// Value to look for.
        #[arg(long, allow_hyphen_values = true)]
        target: Value,
    },
    /// Preview a binary search tree deletion.
    BstDelete {
        /// Values inserted in order, comma separated.
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        values: Vec<Value>,
        /// Value to delete.
        #[arg(long, allow_hyphen_values = true)]
        target: Value,
        /// Apply the deletion after printing the preview.
        #[arg(long)]
        commit: bool,
    },
    /// Walk a tree in pre-, in-, post- or level-order.
    Traverse {
        /// Values inserted in order, comma separated.
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        values: Vec<Value>,
        /// Visiting order.
        #[arg(long, value_enum, default_value_t = Order::In)]
        order: Order,
        /// Build the tree with AVL rebalancing.
        #[arg(long)]
        avl: bool,
    },
    /// Insert into an AVL tree and show the rebalancing.
    AvlInsert {
        /// Values inserted in order before the traced one, comma separated.
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        values: Vec<Value>,
        /// Value to insert with tracing.
        #[arg(long, allow_hyphen_values = true)]
        value: Value,
    },
    /// Build a Huffman tree and code table for a text.
    Huffman {
        /// Input text.
        #[arg(long)]
        text: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Order {
    Pre,
    In,
    Post,
    Level,
}

impl From<Order> for TraversalOrder {
    fn from(order: Order) -> Self {
        match order {
            Order::Pre => TraversalOrder::PreOrder,
            Order::In => TraversalOrder::InOrder,
            Order::Post => TraversalOrder::PostOrder,
            Order::Level => TraversalOrder::LevelOrder,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = EngineConfig::default();
    if let Some(ms) = cli.interval_ms {
        config = config.with_uniform_interval(Duration::from_millis(ms));
    }

    match cli.command {
        Commands::ArrayInsert {
            values,
            index,
            value,
            capacity,
        } => {
            if let Some(capacity) = capacity {
                config = config.with_initial_capacity(capacity);
            }
            run_array_insert(&config, values, index, value, cli.snapshots)?
        }
        Commands::ArrayDelete { values, index } => {
            run_array_delete(&config, values, index, cli.snapshots)?
        }
        Commands::BstSearch { values, target } => {
            run_bst_search(&config, values, target, cli.snapshots)
        }
        Commands::BstDelete {
            values,
            target,
            commit,
        } => run_bst_delete(&config, values, target, commit, cli.snapshots),
        Commands::Traverse { values, order, avl } => {
            run_traverse(&config, values, order.into(), avl, cli.snapshots)
        }
        Commands::AvlInsert { values, value } => {
            run_avl_insert(&config, values, value, cli.snapshots)
        }
        Commands::Huffman { text } => run_huffman(&config, &text, cli.snapshots)?,
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_array(config: &EngineConfig, values: Vec<Value>) -> DynamicArray {
    let mut array = DynamicArray::with_config(config);
    for value in values {
        array.push(value);
    }
    array
}

fn run_array_insert(
    config: &EngineConfig,
    values: Vec<Value>,
    index: usize,
    value: Value,
    snapshots: bool,
) -> Result<()> {
    let mut array = build_array(config, values);
    let trace = array
        .insert_traced(index, value)
        .with_context(|| format!("cannot insert {} at index {}", value, index))?;
    print_trace(&trace, &config.schedule(Domain::Array), snapshots, |cells| {
        format!("{:?}", cells)
    });
    println!("array: {:?} (capacity {})", array.as_slice(), array.capacity());
    Ok(())
}

fn run_array_delete(
    config: &EngineConfig,
    values: Vec<Value>,
    index: usize,
    snapshots: bool,
) -> Result<()> {
    let mut array = build_array(config, values);
    let trace = array
        .delete_traced(index)
        .with_context(|| format!("cannot delete index {}", index))?;
    print_trace(&trace, &config.schedule(Domain::Array), snapshots, |cells| {
        format!("{:?}", cells)
    });
    println!("array: {:?} (capacity {})", array.as_slice(), array.capacity());
    Ok(())
}

fn run_bst_search(config: &EngineConfig, values: Vec<Value>, target: Value, snapshots: bool) {
    let tree: BinarySearchTree = values.into_iter().collect();
    let trace = tree.search_traced(target);
    print_trace(
        &trace,
        &config.schedule(Domain::BstSearch),
        snapshots,
        ToString::to_string,
    );
}

fn run_bst_delete(
    config: &EngineConfig,
    values: Vec<Value>,
    target: Value,
    commit: bool,
    snapshots: bool,
) {
    let mut tree: BinarySearchTree = values.into_iter().collect();
    let trace = tree.delete_traced(target);
    print_trace(
        &trace,
        &config.schedule(Domain::BstDelete),
        snapshots,
        ToString::to_string,
    );
    if commit {
        let removed = tree.commit_delete(target);
        println!(
            "committed: {} ({})",
            if removed { "removed" } else { "nothing to remove" },
            tree.snapshot()
        );
    }
}

fn run_traverse(
    config: &EngineConfig,
    values: Vec<Value>,
    order: TraversalOrder,
    avl: bool,
    snapshots: bool,
) {
    let trace = if avl {
        values.into_iter().collect::<AvlTree>().traverse_traced(order)
    } else {
        values
            .into_iter()
            .collect::<BinarySearchTree>()
            .traverse_traced(order)
    };
    print_trace(
        &trace,
        &config.schedule(Domain::Traversal),
        snapshots,
        ToString::to_string,
    );
}

fn run_avl_insert(config: &EngineConfig, values: Vec<Value>, value: Value, snapshots: bool) {
    let mut tree: AvlTree = values.into_iter().collect();
    match tree.insert_traced(value) {
        Some(trace) => print_trace(
            &trace,
            &config.schedule(Domain::Avl),
            snapshots,
            ToString::to_string,
        ),
        None => println!("{} is already in the tree, nothing to do", value),
    }
    println!("tree: {} (height {})", tree.snapshot(), tree.height());
}

fn run_huffman(config: &EngineConfig, text: &str, snapshots: bool) -> Result<()> {
    let mut coder = HuffmanCoder::new();
    let (trace, codes) = coder
        .build_traced(text)
        .context("cannot build huffman tree")?;
    print_trace(
        &trace,
        &config.schedule(Domain::Huffman),
        snapshots,
        |trees| forest::describe(trees),
    );

    for (symbol, code) in codes.iter() {
        println!("{:?}\t{}", symbol, code);
    }
    let bits = coder.encode(text).context("encoding failed")?;
    let encoded: String = bits.iter().by_vals().map(|bit| if bit { '1' } else { '0' }).collect();
    println!("encoded: {}", encoded);
    let decoded = coder.decode(&bits).context("decoding failed")?;
    anyhow::ensure!(decoded == text, "round trip mismatch: {:?}", decoded);
    Ok(())
}

fn print_trace<E: StepEvent>(
    trace: &Trace<E>,
    schedule: &PlaybackSchedule,
    snapshots: bool,
    render: impl Fn(&E::Snapshot) -> String,
) {
    println!(
        "{}: {} steps, outcome {}, playback {:.1}s",
        trace.operation(),
        trace.len(),
        trace.outcome(),
        schedule.total_for(trace.len()).as_secs_f64()
    );
    for (offset, index) in schedule.frames(trace) {
        let step = &trace[index];
        println!(
            "{:>3} [+{:>5.1}s] {}",
            index,
            offset.as_secs_f64(),
            step
        );
        if snapshots {
            if let Some(snapshot) = step.snapshot() {
                println!("              {}", render(snapshot));
            }
        }
    }
}
