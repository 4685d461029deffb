//! # zcraft CLI
//!
//! Command-line window into a story file's memory.
//!
//! Usage:
//!   zcraft header <story> [--json]
//!   zcraft peek <story> <offset> [--width 1|2|4]
//!   zcraft unpack <story> <packed> [--kind routine|string]
//!   zcraft verify <story>
//!   zcraft dump <story> [--from <offset>] [--count <n>]
//!
//! Examples:
//!   zcraft header zork1.z3
//!   zcraft peek zork1.z3 0x0e --width 2
//!   zcraft unpack trinity.z4 0x1a2b --kind string
//!   RUST_LOG=zcraft_vm=debug zcraft verify zork1.z3

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use zcraft_vm::{
    load_file, AddressKind, Cursor, ExecutionContext, LoaderConfig, Result, StoryBuffer,
};

#[derive(Parser)]
#[command(name = "zcraft")]
#[command(author, version, about = "zcraft - inspect story-file memory")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Reject stories whose checksum does not match the header
    #[arg(long, global = true)]
    verify_checksum: bool,

    /// Reject stories shorter than the header's file length
    #[arg(long, global = true)]
    strict_length: bool,

    /// Enable verbose output (debug logging for the memory layer)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the story header
    Header {
        /// Path to the story file
        story: String,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Read a byte or word at an offset
    Peek {
        story: String,

        /// Byte offset (decimal or 0x-prefixed hex)
        #[arg(value_parser = parse_number)]
        offset: usize,

        /// Access width in bytes
        #[arg(short, long, value_enum, default_value_t = WidthArg::Byte)]
        width: WidthArg,
    },
    /// Translate a packed address to a byte address
    Unpack {
        story: String,

        /// Packed address (decimal or 0x-prefixed hex)
        #[arg(value_parser = parse_number)]
        packed: usize,

        #[arg(short, long, value_enum, default_value_t = KindArg::Routine)]
        kind: KindArg,
    },
    /// Compare the computed checksum with the header
    Verify { story: String },
    /// Hex dump through the fetch cursor
    Dump {
        story: String,

        /// Start offset; defaults to the story's entry point
        #[arg(short, long, value_parser = parse_number)]
        from: Option<usize>,

        /// Number of bytes
        #[arg(short, long, default_value = "64")]
        count: usize,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Routine,
    #[value(name = "string")]
    Text,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum WidthArg {
    #[value(name = "1")]
    Byte,
    #[value(name = "2")]
    Word,
    #[value(name = "4")]
    Double,
}

impl From<KindArg> for AddressKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Routine => AddressKind::Routine,
            KindArg::Text => AddressKind::String,
        }
    }
}

fn parse_number(s: &str) -> std::result::Result<usize, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => usize::from_str_radix(hex, 16),
        None => s.parse::<usize>(),
    };
    parsed.map_err(|e| format!("'{}' is not a number: {}", s, e))
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "warn,zcraft_vm=debug"
    } else {
        "warn,zcraft_vm=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn show_header(story: &StoryBuffer, json: bool) -> Result<()> {
    let header = story.header();
    if json {
        let text = serde_json::to_string_pretty(header).map_err(|e| {
            zcraft_vm::Error::new(zcraft_vm::ErrorKind::SerializationFailed, e.to_string())
                .with_operation("cli::header")
        })?;
        println!("{}", text);
        return Ok(());
    }

    println!("Version:        {} ({:?})", header.version(), header.band());
    println!("Length:         {} bytes", story.len());
    let Some(layout) = header.layout() else {
        println!("(story shorter than the 64-byte header; no further fields)");
        return Ok(());
    };
    println!("Release:        {}", layout.release);
    println!("Serial:         {}", layout.serial);
    println!("Initial PC:     {:#06x}", layout.initial_pc);
    println!("Static base:    {:#06x}", layout.static_base);
    println!("High base:      {:#06x}", layout.high_base);
    println!("Dictionary:     {:#06x}", layout.dictionary);
    println!("Object table:   {:#06x}", layout.object_table);
    println!("Globals:        {:#06x}", layout.globals);
    println!("Abbreviations:  {:#06x}", layout.abbreviations);
    println!("File length:    {}", layout.file_length);
    println!("Checksum:       {:#06x}", layout.checksum);
    if header.band().uses_offsets() {
        println!("Routines off.:  {:#06x}", layout.routines_offset);
        println!("Strings off.:   {:#06x}", layout.strings_offset);
    }
    Ok(())
}

fn peek(story: &StoryBuffer, offset: usize, width: WidthArg) -> Result<()> {
    match width {
        WidthArg::Byte => println!("{:#06x}: {:#04x}", offset, story.get_byte(offset)?),
        WidthArg::Word => println!("{:#06x}: {:#06x}", offset, story.get16(offset)?),
        WidthArg::Double => println!("{:#06x}: {:#010x}", offset, story.get32(offset)?),
    }
    Ok(())
}

fn unpack(story: StoryBuffer, packed: usize, kind: KindArg) -> Result<()> {
    let packed = u16::try_from(packed).map_err(|_| {
        zcraft_vm::Error::invalid_argument(format!("packed address {:#x} exceeds 16 bits", packed))
    })?;
    let ctx = ExecutionContext::new(story);
    let address = ctx.translator().unpack(packed, kind.into());
    let region = ctx
        .map()
        .region_of(address)
        .map(|r| format!("{:?}", r).to_lowercase())
        .unwrap_or_else(|| "outside story".to_string());
    println!("{:#06x} -> {:#07x} ({})", packed, address, region);
    Ok(())
}

fn verify(story: &StoryBuffer) -> Result<()> {
    let actual = story.checksum();
    match story.header().layout() {
        Some(layout) if layout.checksum == actual => {
            println!("checksum ok ({:#06x})", actual);
            Ok(())
        }
        Some(layout) => Err(zcraft_vm::Error::checksum_mismatch(layout.checksum, actual)),
        None => Err(zcraft_vm::Error::unsupported(
            "story has no header checksum to verify",
        )),
    }
}

fn dump(story: StoryBuffer, from: Option<usize>, count: usize) -> Result<()> {
    let ctx = ExecutionContext::new(story);
    let story = ctx.story();
    let mut cursor = Cursor::new(from.unwrap_or(ctx.pc()));
    let end = cursor.offset().saturating_add(count).min(story.len());

    if count > 0 {
        cursor.peek_byte(story)?;
    }
    while cursor.offset() < end {
        let row_start = cursor.offset();
        let mut row = Vec::with_capacity(16);
        while row.len() < 16 && cursor.offset() < end {
            row.push(cursor.read_byte(story)?);
        }
        let hex: Vec<String> = row.iter().map(|b| format!("{:02x}", b)).collect();
        println!("{:06x}  {}", row_start, hex.join(" "));
    }
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let config = LoaderConfig {
        verify_checksum: cli.verify_checksum,
        enforce_file_length: cli.strict_length,
        ..LoaderConfig::default()
    };
    tracing::debug!(?config, "loader configured");

    match cli.command {
        Commands::Header { story, json } => show_header(&load_file(story, &config)?, json),
        Commands::Peek {
            story,
            offset,
            width,
        } => peek(&load_file(story, &config)?, offset, width),
        Commands::Unpack {
            story,
            packed,
            kind,
        } => unpack(load_file(story, &config)?, packed, kind),
        Commands::Verify { story } => verify(&load_file(story, &config)?),
        Commands::Dump { story, from, count } => dump(load_file(story, &config)?, from, count),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
