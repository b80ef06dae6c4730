use clap::{Command, Arg, ArgMatches};

use loxchunk::{Chunk, Heap, GcConfig, Value, OpCode, LineNumber, ChunkResult};
use loxchunk::debug::Disassembler;

fn main() {
    env_logger::init();

    let app = Command::new("lox-dasm")
        .version(clap::crate_version!())
        .about("Build a bytecode chunk from constant literals and disassemble it")
        .arg(
            Arg::new("values")
            .index(1)
            .multiple_values(true)
            .help("literals to load: numbers, true, false, nil, anything else is a string")
            .value_name("VALUE")
        )
        .arg(
            Arg::new("repeat")
            .short('r')
            .long("repeat")
            .takes_value(true)
            .help("emit the literals this many times (use > 256 constants to see the long form)")
            .value_name("N")
        )
        .arg(
            Arg::new("name")
            .short('n')
            .long("name")
            .takes_value(true)
            .help("name printed in the disassembly header")
            .value_name("NAME")
        )
        .arg(
            Arg::new("stress_gc")
            .long("stress-gc")
            .help("run a garbage collection on every allocation")
        );

    let args = app.get_matches();

    let repeat = match args.value_of("repeat").map(str::parse::<usize>) {
        None => 1,
        Some(Ok(repeat)) => repeat,
        Some(Err(error)) => {
            eprintln!("Invalid repeat count: {}.", error);
            return;
        },
    };

    let config = GcConfig {
        stress: args.is_present("stress_gc"),
        ..GcConfig::default()
    };
    let mut heap = Heap::new(config);

    let chunk = match build_chunk(&mut heap, &args, repeat) {
        Ok(chunk) => chunk,
        Err(error) => {
            eprintln!("{}", error);
            return;
        },
    };

    let name = args.value_of("name").unwrap_or("<cmd>");
    let dasm = Disassembler::new(&chunk)
        .with_name(name)
        .with_heap(&heap);

    print!("{}", dasm);
    log::info!("{}", heap.stats());
}

fn build_chunk(heap: &mut Heap, args: &ArgMatches, repeat: usize) -> ChunkResult<Chunk> {
    let literals: Vec<&str> = args.values_of("values")
        .map_or_else(Vec::new, |values| values.collect());

    let mut chunk = Chunk::new();
    let mut line: LineNumber = 1;
    for _ in 0..repeat {
        for literal in literals.iter() {
            let value = parse_literal(heap, &chunk, literal);
            chunk.emit_constant(heap, value, line)?;
            line = next_line(line);
        }
    }
    chunk.emit_byte(OpCode::Return, line);

    Ok(chunk)
}

fn parse_literal(heap: &mut Heap, chunk: &Chunk, literal: &str) -> Value {
    match literal {
        "nil" => Value::Nil,
        "true" => Value::from(true),
        "false" => Value::from(false),
        _ => match literal.parse::<f64>() {
            Ok(number) => Value::from(number),
            Err(..) => Value::from(heap.intern(literal, chunk)),
        },
    }
}

// past LineNumber::MAX every remaining literal shares the last line
fn next_line(line: LineNumber) -> LineNumber {
    line.saturating_add(1)
}
