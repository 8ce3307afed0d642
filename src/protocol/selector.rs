//! # Token Selector Compiler
//!
//! A selector describes which tokens an operation targets, either as an
//! explicit id list or as a declarative attribute filter. Both forms compile
//! into one canonical tagged wire shape:
//!
//! - **Explicit** (tag 0): the id list becomes a canonically ordered flat set.
//! - **Attribute filter** (tag 1): `{max_count, max_amount, filter tree}`
//!   becomes `{max_count, max_amount, instruction stack}`, the tree flattened
//!   in pre-order (Polish notation). A boolean node emits its operator
//!   instruction first, then its left and right sub-expressions; a leaf emits
//!   a predicate instruction carrying its comparison op-code, attribute key,
//!   and typed literal.
//!
//! Decoding reconstructs the tree by recursive descent: an operator's two
//! operands are the next two complete sub-expressions following it. Encode
//! and decode are exact inverses; no canonicalization of the tree itself is
//! attempted.
//!
//! Relative-time literals (expiration bounds and the like) are resolved to an
//! absolute point-in-time exactly once, at compile time, against the `now`
//! the caller passes in. The compiler never reads a clock.

use crate::core::{ByteReader, ByteWriter, PointInTime};
use crate::error::{constants, CodecError, Result};
use crate::protocol::object_id::{self, ObjectId};
use serde::{Deserialize, Serialize};

/// Token objects live in space 1, type 7.
pub const TOKEN_SPACE: u8 = 1;
pub const TOKEN_TYPE: u8 = 7;

/// Wire tag for the explicit id-set selector form.
pub const SELECTOR_TAG_IDS: u64 = 0;
/// Wire tag for the attribute-filter selector form.
pub const SELECTOR_TAG_FILTER: u64 = 1;

const INSTRUCTION_TAG_OPERATOR: u64 = 0;
const INSTRUCTION_TAG_PREDICATE: u64 = 1;

const LITERAL_TAG_STR: u64 = 0;
const LITERAL_TAG_UINT: u64 = 1;

/// Boolean combinator, arity 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoolOp {
    And,
    Or,
}

impl BoolOp {
    pub fn opcode(self) -> u8 {
        match self {
            BoolOp::And => 0,
            BoolOp::Or => 1,
        }
    }

    pub fn from_opcode(code: u8) -> Result<Self> {
        match code {
            0 => Ok(BoolOp::And),
            1 => Ok(BoolOp::Or),
            _ => Err(CodecError::Value(constants::ERR_BAD_FILTER_OPCODE.into())),
        }
    }
}

/// Predicate comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareOp {
    Eq,
    Gt,
    Lt,
    Ge,
    Le,
    Ne,
}

impl CompareOp {
    pub fn opcode(self) -> u8 {
        match self {
            CompareOp::Eq => 0,
            CompareOp::Gt => 1,
            CompareOp::Lt => 2,
            CompareOp::Ge => 3,
            CompareOp::Le => 4,
            CompareOp::Ne => 5,
        }
    }

    pub fn from_opcode(code: u8) -> Result<Self> {
        match code {
            0 => Ok(CompareOp::Eq),
            1 => Ok(CompareOp::Gt),
            2 => Ok(CompareOp::Lt),
            3 => Ok(CompareOp::Ge),
            4 => Ok(CompareOp::Le),
            5 => Ok(CompareOp::Ne),
            _ => Err(CodecError::Value(constants::ERR_BAD_COMPARE_OPCODE.into())),
        }
    }
}

/// Literal as supplied by the caller. Relative times carry an offset in
/// seconds from "now" and exist only pre-compilation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Literal {
    Str(String),
    Int(i64),
    RelativeTime(i64),
}

/// Literal as carried on the wire: string (tag 0) or unsigned int (tag 1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompiledLiteral {
    Str(String),
    UInt(u64),
}

impl CompiledLiteral {
    fn write(&self, w: &mut ByteWriter) {
        match self {
            CompiledLiteral::Str(s) => {
                w.write_varint(LITERAL_TAG_STR);
                w.write_string(s);
            }
            CompiledLiteral::UInt(v) => {
                w.write_varint(LITERAL_TAG_UINT);
                w.write_u64(*v);
            }
        }
    }

    fn read(r: &mut ByteReader<'_>) -> Result<Self> {
        match r.read_varint()? {
            LITERAL_TAG_STR => Ok(CompiledLiteral::Str(r.read_string()?)),
            LITERAL_TAG_UINT => Ok(CompiledLiteral::UInt(r.read_u64()?)),
            _ => Err(CodecError::Value(constants::ERR_BAD_LITERAL_TAG.into())),
        }
    }
}

/// Attribute-filter expression tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterExpr {
    And(Box<FilterExpr>, Box<FilterExpr>),
    Or(Box<FilterExpr>, Box<FilterExpr>),
    Predicate {
        key: String,
        op: CompareOp,
        value: Literal,
    },
}

impl FilterExpr {
    /// Convenience constructor for a leaf predicate.
    pub fn predicate(key: impl Into<String>, op: CompareOp, value: Literal) -> Self {
        FilterExpr::Predicate {
            key: key.into(),
            op,
            value,
        }
    }
}

/// A token selector as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenSelector {
    /// Explicit token id list; order does not matter.
    Ids(Vec<ObjectId>),
    /// Declarative filter bounded by count and total amount.
    Filter {
        max_count: u32,
        max_amount: i64,
        filter: FilterExpr,
    },
}

/// One instruction of the flattened filter stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterInstruction {
    Operator(BoolOp),
    Predicate {
        op: CompareOp,
        key: String,
        value: CompiledLiteral,
    },
}

impl FilterInstruction {
    fn write(&self, w: &mut ByteWriter) {
        match self {
            FilterInstruction::Operator(op) => {
                w.write_varint(INSTRUCTION_TAG_OPERATOR);
                w.write_u8(op.opcode());
            }
            FilterInstruction::Predicate { op, key, value } => {
                w.write_varint(INSTRUCTION_TAG_PREDICATE);
                w.write_u8(op.opcode());
                w.write_string(key);
                value.write(w);
            }
        }
    }

    fn read(r: &mut ByteReader<'_>) -> Result<Self> {
        match r.read_varint()? {
            INSTRUCTION_TAG_OPERATOR => Ok(FilterInstruction::Operator(BoolOp::from_opcode(
                r.read_u8()?,
            )?)),
            INSTRUCTION_TAG_PREDICATE => {
                let op = CompareOp::from_opcode(r.read_u8()?)?;
                let key = r.read_string()?;
                let value = CompiledLiteral::read(r)?;
                Ok(FilterInstruction::Predicate { op, key, value })
            }
            _ => Err(CodecError::Value(constants::ERR_BAD_FILTER_OPCODE.into())),
        }
    }
}

/// A selector compiled to its canonical wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompiledSelector {
    Ids(Vec<ObjectId>),
    Filter {
        max_count: u32,
        max_amount: i64,
        stack: Vec<FilterInstruction>,
    },
}

/// Compile a selector. Pure: relative times resolve against the supplied
/// `now`, negative integer literals are rejected (the wire field is
/// unsigned), and the filter tree flattens to its pre-order stack.
pub fn compile(selector: &TokenSelector, now: PointInTime) -> Result<CompiledSelector> {
    match selector {
        TokenSelector::Ids(ids) => {
            let mut sorted = ids.clone();
            object_id::sort_canonical(&mut sorted);
            Ok(CompiledSelector::Ids(sorted))
        }
        TokenSelector::Filter {
            max_count,
            max_amount,
            filter,
        } => {
            let mut stack = Vec::new();
            flatten(filter, now, &mut stack)?;
            Ok(CompiledSelector::Filter {
                max_count: *max_count,
                max_amount: *max_amount,
                stack,
            })
        }
    }
}

fn flatten(expr: &FilterExpr, now: PointInTime, out: &mut Vec<FilterInstruction>) -> Result<()> {
    match expr {
        FilterExpr::And(left, right) => {
            out.push(FilterInstruction::Operator(BoolOp::And));
            flatten(left, now, out)?;
            flatten(right, now, out)
        }
        FilterExpr::Or(left, right) => {
            out.push(FilterInstruction::Operator(BoolOp::Or));
            flatten(left, now, out)?;
            flatten(right, now, out)
        }
        FilterExpr::Predicate { key, op, value } => {
            out.push(FilterInstruction::Predicate {
                op: *op,
                key: key.clone(),
                value: compile_literal(value, now)?,
            });
            Ok(())
        }
    }
}

fn compile_literal(value: &Literal, now: PointInTime) -> Result<CompiledLiteral> {
    match value {
        Literal::Str(s) => Ok(CompiledLiteral::Str(s.clone())),
        Literal::Int(v) => {
            if *v < 0 {
                return Err(CodecError::Value(constants::ERR_NEGATIVE_UNSIGNED.into()));
            }
            Ok(CompiledLiteral::UInt(*v as u64))
        }
        Literal::RelativeTime(delta) => {
            let at = now.offset(*delta)?;
            Ok(CompiledLiteral::UInt(at.as_unix() as u64))
        }
    }
}

impl CompiledSelector {
    /// Wire form: varint(selector tag) + form-specific payload.
    pub fn write(&self, w: &mut ByteWriter) -> Result<()> {
        match self {
            CompiledSelector::Ids(ids) => {
                w.write_varint(SELECTOR_TAG_IDS);
                object_id::write_flat_set(w, ids);
            }
            CompiledSelector::Filter {
                max_count,
                max_amount,
                stack,
            } => {
                w.write_varint(SELECTOR_TAG_FILTER);
                w.write_u32(*max_count);
                w.write_i64(*max_amount);
                w.write_varint(stack.len() as u64);
                for instruction in stack {
                    instruction.write(w);
                }
            }
        }
        Ok(())
    }

    /// Decode a compiled selector, validating that a filter stack forms one
    /// complete pre-order expression.
    pub fn read(r: &mut ByteReader<'_>) -> Result<Self> {
        match r.read_varint()? {
            SELECTOR_TAG_IDS => Ok(CompiledSelector::Ids(object_id::read_flat_set(
                r,
                TOKEN_SPACE,
                TOKEN_TYPE,
            )?)),
            SELECTOR_TAG_FILTER => {
                let max_count = r.read_u32()?;
                let max_amount = r.read_i64()?;
                let count = r.read_varint()?;
                let mut stack = Vec::with_capacity(count.min(256) as usize);
                for _ in 0..count {
                    stack.push(FilterInstruction::read(r)?);
                }
                let selector = CompiledSelector::Filter {
                    max_count,
                    max_amount,
                    stack,
                };
                selector.filter_expr()?;
                Ok(selector)
            }
            _ => Err(CodecError::Value(constants::ERR_BAD_SELECTOR_TAG.into())),
        }
    }

    /// Reconstruct the expression tree from a filter stack by recursive
    /// descent: an operator consumes the next two complete sub-expressions.
    /// Returns `None` for the explicit id-set form.
    pub fn filter_expr(&self) -> Result<Option<FilterExpr>> {
        let stack = match self {
            CompiledSelector::Ids(_) => return Ok(None),
            CompiledSelector::Filter { stack, .. } => stack,
        };
        let mut cursor = 0;
        let expr = parse_expr(stack, &mut cursor)?;
        if cursor != stack.len() {
            return Err(CodecError::Value(
                constants::ERR_TRAILING_INSTRUCTIONS.into(),
            ));
        }
        Ok(Some(expr))
    }
}

fn parse_expr(stack: &[FilterInstruction], cursor: &mut usize) -> Result<FilterExpr> {
    let instruction = stack
        .get(*cursor)
        .ok_or_else(|| CodecError::Value(constants::ERR_DANGLING_OPERATOR.into()))?;
    *cursor += 1;
    match instruction {
        FilterInstruction::Operator(op) => {
            let left = Box::new(parse_expr(stack, cursor)?);
            let right = Box::new(parse_expr(stack, cursor)?);
            Ok(match op {
                BoolOp::And => FilterExpr::And(left, right),
                BoolOp::Or => FilterExpr::Or(left, right),
            })
        }
        FilterInstruction::Predicate { op, key, value } => Ok(FilterExpr::Predicate {
            key: key.clone(),
            op: *op,
            value: match value {
                CompiledLiteral::Str(s) => Literal::Str(s.clone()),
                CompiledLiteral::UInt(v) => Literal::Int(*v as i64),
            },
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> PointInTime {
        PointInTime::from_unix(1_000_000)
    }

    fn tid(instance: u64) -> ObjectId {
        ObjectId::new(TOKEN_SPACE, TOKEN_TYPE, instance).unwrap()
    }

    #[test]
    fn explicit_ids_compile_to_canonical_order() {
        let selector = TokenSelector::Ids(vec![tid(5), tid(2), tid(9)]);
        let compiled = compile(&selector, now()).unwrap();
        assert_eq!(compiled, CompiledSelector::Ids(vec![tid(2), tid(5), tid(9)]));
    }

    #[test]
    fn filter_tree_flattens_preorder() {
        let filter = FilterExpr::And(
            Box::new(FilterExpr::predicate("attr1", CompareOp::Gt, Literal::Int(100))),
            Box::new(FilterExpr::predicate(
                "attr2",
                CompareOp::Eq,
                Literal::Str("abc".into()),
            )),
        );
        let selector = TokenSelector::Filter {
            max_count: 10,
            max_amount: 1000,
            filter,
        };
        let compiled = compile(&selector, now()).unwrap();
        let CompiledSelector::Filter { stack, .. } = compiled else {
            panic!("expected filter form");
        };
        assert_eq!(
            stack,
            vec![
                FilterInstruction::Operator(BoolOp::And),
                FilterInstruction::Predicate {
                    op: CompareOp::Gt,
                    key: "attr1".into(),
                    value: CompiledLiteral::UInt(100),
                },
                FilterInstruction::Predicate {
                    op: CompareOp::Eq,
                    key: "attr2".into(),
                    value: CompiledLiteral::Str("abc".into()),
                },
            ]
        );
    }

    #[test]
    fn relative_time_overflow_is_a_range_error() {
        let selector = TokenSelector::Filter {
            max_count: 1,
            max_amount: 1,
            filter: FilterExpr::predicate(
                "max_expiration",
                CompareOp::Le,
                Literal::RelativeTime(i64::MAX),
            ),
        };
        let err = compile(&selector, PointInTime::from_unix(1)).unwrap_err();
        assert!(matches!(err, CodecError::Range { width: 32, .. }));
    }

    #[test]
    fn negative_int_literal_rejected() {
        let selector = TokenSelector::Filter {
            max_count: 1,
            max_amount: 1,
            filter: FilterExpr::predicate("attr", CompareOp::Eq, Literal::Int(-5)),
        };
        let err = compile(&selector, now()).unwrap_err();
        assert!(matches!(err, CodecError::Value(_)));
    }

    #[test]
    fn relative_time_resolved_at_compile() {
        let selector = TokenSelector::Filter {
            max_count: 1,
            max_amount: 1,
            filter: FilterExpr::predicate(
                "max_expiration",
                CompareOp::Le,
                Literal::RelativeTime(3600),
            ),
        };
        let compiled = compile(&selector, now()).unwrap();
        let CompiledSelector::Filter { stack, .. } = compiled else {
            panic!("expected filter form");
        };
        assert_eq!(
            stack[0],
            FilterInstruction::Predicate {
                op: CompareOp::Le,
                key: "max_expiration".into(),
                value: CompiledLiteral::UInt(1_003_600),
            }
        );
    }

    #[test]
    fn nested_tree_roundtrips_through_wire() {
        let filter = FilterExpr::Or(
            Box::new(FilterExpr::And(
                Box::new(FilterExpr::predicate("a", CompareOp::Ge, Literal::Int(1))),
                Box::new(FilterExpr::predicate("b", CompareOp::Lt, Literal::Int(2))),
            )),
            Box::new(FilterExpr::predicate(
                "c",
                CompareOp::Ne,
                Literal::Str("z".into()),
            )),
        );
        let selector = TokenSelector::Filter {
            max_count: 3,
            max_amount: 7,
            filter: filter.clone(),
        };
        let compiled = compile(&selector, now()).unwrap();

        let mut w = ByteWriter::new();
        compiled.write(&mut w).unwrap();
        let mut r = ByteReader::new(w.as_slice());
        let back = CompiledSelector::read(&mut r).unwrap();
        assert!(r.is_empty());
        assert_eq!(back, compiled);
        assert_eq!(back.filter_expr().unwrap(), Some(filter));
    }

    #[test]
    fn dangling_operator_rejected_on_decode() {
        // tag 1 filter, max_count, max_amount, one lone AND operator
        let mut w = ByteWriter::new();
        w.write_varint(SELECTOR_TAG_FILTER);
        w.write_u32(1);
        w.write_i64(1);
        w.write_varint(1);
        w.write_varint(0); // operator instruction
        w.write_u8(0); // AND
        let mut r = ByteReader::new(w.as_slice());
        assert!(matches!(
            CompiledSelector::read(&mut r),
            Err(CodecError::Value(_))
        ));
    }

    #[test]
    fn malformed_opcode_rejected() {
        assert!(BoolOp::from_opcode(2).is_err());
        assert!(CompareOp::from_opcode(6).is_err());
    }

    #[test]
    fn ids_selector_roundtrips_through_wire() {
        let compiled = compile(&TokenSelector::Ids(vec![tid(9), tid(2)]), now()).unwrap();
        let mut w = ByteWriter::new();
        compiled.write(&mut w).unwrap();
        let mut r = ByteReader::new(w.as_slice());
        assert_eq!(CompiledSelector::read(&mut r).unwrap(), compiled);
    }
}
