#![cfg(test)]

use crate::runtime::{Heap, Value};
use crate::codegen::{Chunk, OpCode};
use super::Disassembler;


#[test]
fn dasm_prints_constants_and_repeated_lines() {
    let mut heap = Heap::default();
    let mut chunk = Chunk::new();

    chunk.emit_constant(&mut heap, Value::from(1.2), 123).unwrap();
    chunk.emit_byte(OpCode::Negate, 123);
    chunk.emit_byte(OpCode::Return, 124);

    let output = Disassembler::new(&chunk).with_name("test chunk").to_string();
    let expected = "\
== test chunk ==
0000  123 OP_CONSTANT         0 '1.2'
0002    | OP_NEGATE
0003  124 OP_RETURN
";
    assert_eq!(output, expected);
}

#[test]
fn dasm_decodes_long_constants() {
    let mut heap = Heap::default();
    let mut chunk = Chunk::new();

    for i in 0..=256 {
        chunk.emit_constant(&mut heap, Value::from(f64::from(i)), 1).unwrap();
    }

    let output = Disassembler::new(&chunk).to_string();
    let last = output.lines().last().unwrap();
    assert_eq!(last, "0512    | OP_CONSTANT_LONG  256 '256'");
}

#[test]
fn dasm_resolves_strings_through_heap() {
    let mut heap = Heap::default();
    let mut chunk = Chunk::new();

    let short = heap.intern("hello", &chunk);
    chunk.emit_constant(&mut heap, Value::from(short), 1).unwrap();
    let long = heap.intern("a string constant that goes on for a while", &chunk);
    chunk.emit_constant(&mut heap, Value::from(long), 2).unwrap();

    let output = Disassembler::new(&chunk).with_heap(&heap).to_string();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines[0], "0000    1 OP_CONSTANT         0 '\"hello\"'");
    assert_eq!(lines[1], "0002    2 OP_CONSTANT         1 '\"a string cons...\"'");

    // without the heap only the handle is known
    let output = Disassembler::new(&chunk).to_string();
    assert!(output.lines().next().unwrap().ends_with(&format!("'<obj {}>'", short)));
}

#[test]
fn dasm_skips_unknown_opcodes() {
    let mut chunk = Chunk::new();
    chunk.emit_byte(0xEEu8, 7);
    chunk.emit_byte(OpCode::Return, 7);

    let output = Disassembler::new(&chunk).to_string();
    assert_eq!(output, "0000    7 Unknown! 0xee\n0001    | OP_RETURN\n");
}

#[test]
fn dasm_handles_truncated_constant() {
    let mut chunk = Chunk::new();
    chunk.emit_byte(OpCode::ConstantLong, 1);
    chunk.emit_byte(0u8, 1);

    let output = Disassembler::new(&chunk).to_string();
    assert_eq!(output, "0000    1 OP_CONSTANT_LONG <truncated>\n");
}
