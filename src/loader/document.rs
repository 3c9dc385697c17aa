//! Conversion from a parsed JSON tree into the typed grammar model.
//!
//! Unknown fields are ignored. Missing required fields (instruction `opname`/`opcode`,
//! operand kind `kind`, enumerant `enumerant`/`value`) abort the conversion with a
//! [`GrammarError::Malformed`] naming the offending path.

use serde_json::{Map, Value};

use crate::tables::error::{GrammarError, GrammarResult};
use crate::tables::model::{
    Enumerant, EnumerantValue, Grammar, Instruction, NameTuple, OperandCategory, OperandKind,
    OperandSpec, Quantifier,
};
use crate::tables::version::GrammarVersion;

/// Parses grammar JSON text.
pub fn parse_str(src: &str) -> GrammarResult<Grammar> {
    let value: Value = serde_json::from_str(src)?;
    grammar_from_value(&value)
}

pub fn grammar_from_value(value: &Value) -> GrammarResult<Grammar> {
    let root = as_object(value, "<root>")?;
    let instructions = match root.get("instructions") {
        Some(list) => as_array(list, "instructions")?
            .iter()
            .enumerate()
            .map(|(index, item)| instruction(item, &format!("instructions[{index}]")))
            .collect::<GrammarResult<Vec<_>>>()?,
        None => return Err(GrammarError::malformed("<root>", "missing 'instructions'")),
    };
    let operand_kinds = match root.get("operand_kinds") {
        Some(list) => as_array(list, "operand_kinds")?
            .iter()
            .enumerate()
            .map(|(index, item)| operand_kind(item, &format!("operand_kinds[{index}]")))
            .collect::<GrammarResult<Vec<_>>>()?,
        None => Vec::new(),
    };
    Ok(Grammar {
        instructions,
        operand_kinds,
    })
}

fn instruction(value: &Value, ctx: &str) -> GrammarResult<Instruction> {
    let obj = as_object(value, ctx)?;
    let name = required_str(obj, "opname", ctx)?;
    if name.is_empty() {
        return Err(GrammarError::malformed(ctx, "'opname' is empty"));
    }
    let opcode = match obj.get("opcode") {
        Some(value) => value
            .as_u64()
            .and_then(|raw| u32::try_from(raw).ok())
            .ok_or_else(|| GrammarError::malformed(ctx, "'opcode' is not a 32-bit unsigned integer"))?,
        None => return Err(GrammarError::malformed(ctx, format!("instruction '{name}' is missing 'opcode'"))),
    };
    Ok(Instruction {
        name: name.to_string(),
        opcode,
        capabilities: names(obj, "capabilities", ctx)?,
        extensions: names(obj, "extensions", ctx)?,
        operands: operands(obj, "operands", ctx)?,
        version: version(obj, "version", ctx)?,
        last_version: version(obj, "lastVersion", ctx)?,
    })
}

fn operand_kind(value: &Value, ctx: &str) -> GrammarResult<OperandKind> {
    let obj = as_object(value, ctx)?;
    let name = required_str(obj, "kind", ctx)?.to_string();
    let category = OperandCategory::from_name(optional_str(obj, "category", ctx)?.unwrap_or(""));
    let enumerants = match obj.get("enumerants") {
        Some(list) => as_array(list, ctx)?
            .iter()
            .enumerate()
            .map(|(index, item)| {
                enumerant(item, &category, &format!("{ctx}.enumerants[{index}]"))
            })
            .collect::<GrammarResult<Vec<_>>>()?,
        None => Vec::new(),
    };
    Ok(OperandKind {
        name,
        category,
        enumerants,
    })
}

fn enumerant(value: &Value, category: &OperandCategory, ctx: &str) -> GrammarResult<Enumerant> {
    let obj = as_object(value, ctx)?;
    let name = required_str(obj, "enumerant", ctx)?.to_string();
    let value = match obj.get("value") {
        Some(raw) => enumerant_value(raw, category, ctx)?,
        None => {
            return Err(GrammarError::malformed(
                ctx,
                format!("enumerant '{name}' is missing 'value'"),
            ));
        }
    };
    Ok(Enumerant {
        name,
        value,
        capabilities: names(obj, "capabilities", ctx)?,
        extensions: names(obj, "extensions", ctx)?,
        parameters: operands(obj, "parameters", ctx)?,
        version: version(obj, "version", ctx)?,
        last_version: version(obj, "lastVersion", ctx)?,
    })
}

/// Integers are taken as-is; strings are hexadecimal for bit enumerations (with or without
/// `0x`) and for any `0x`-prefixed spelling, decimal otherwise.
fn enumerant_value(
    raw: &Value,
    category: &OperandCategory,
    ctx: &str,
) -> GrammarResult<EnumerantValue> {
    let parsed = match raw {
        Value::Number(number) => number.as_u64().map(EnumerantValue::decimal),
        Value::String(text) => {
            let hex = text.starts_with("0x") || text.starts_with("0X");
            if hex || *category == OperandCategory::BitEnum {
                EnumerantValue::hex(text.as_str())
            } else {
                text.parse::<u64>().ok().map(|numeric| EnumerantValue {
                    numeric,
                    literal: text.clone(),
                })
            }
        }
        _ => None,
    };
    parsed.ok_or_else(|| GrammarError::malformed(ctx, format!("unusable enumerant value {raw}")))
}

fn operands(obj: &Map<String, Value>, key: &str, ctx: &str) -> GrammarResult<Vec<OperandSpec>> {
    let Some(list) = obj.get(key) else {
        return Ok(Vec::new());
    };
    as_array(list, ctx)?
        .iter()
        .enumerate()
        .map(|(index, item)| -> GrammarResult<OperandSpec> {
            let ctx = format!("{ctx}.{key}[{index}]");
            let operand = as_object(item, &ctx)?;
            let kind = required_str(operand, "kind", &ctx)?.to_string();
            let marker = optional_str(operand, "quantifier", &ctx)?;
            let quantifier = Quantifier::from_marker(marker).ok_or_else(|| {
                GrammarError::malformed(&ctx, format!("unknown quantifier {marker:?}"))
            })?;
            Ok(OperandSpec {
                kind,
                quantifier,
                name: optional_str(operand, "name", &ctx)?.map(str::to_string),
            })
        })
        .collect()
}

fn names(obj: &Map<String, Value>, key: &str, ctx: &str) -> GrammarResult<NameTuple> {
    let Some(list) = obj.get(key) else {
        return Ok(NameTuple::new());
    };
    as_array(list, ctx)?
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| GrammarError::malformed(ctx, format!("'{key}' entry {item} is not a string")))
        })
        .collect()
}

fn version(obj: &Map<String, Value>, key: &str, ctx: &str) -> GrammarResult<Option<GrammarVersion>> {
    let Some(text) = optional_str(obj, key, ctx)? else {
        return Ok(None);
    };
    GrammarVersion::parse(text)
        .map(Some)
        .ok_or_else(|| GrammarError::malformed(ctx, format!("'{key}' value '{text}' is not 'X.Y' or 'None'")))
}

fn as_object<'v>(value: &'v Value, ctx: &str) -> GrammarResult<&'v Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| GrammarError::malformed(ctx, "expected a JSON object"))
}

fn as_array<'v>(value: &'v Value, ctx: &str) -> GrammarResult<&'v Vec<Value>> {
    value
        .as_array()
        .ok_or_else(|| GrammarError::malformed(ctx, "expected a JSON array"))
}

fn required_str<'v>(obj: &'v Map<String, Value>, key: &str, ctx: &str) -> GrammarResult<&'v str> {
    optional_str(obj, key, ctx)?
        .ok_or_else(|| GrammarError::malformed(ctx, format!("missing '{key}'")))
}

fn optional_str<'v>(
    obj: &'v Map<String, Value>,
    key: &str,
    ctx: &str,
) -> GrammarResult<Option<&'v str>> {
    match obj.get(key) {
        None => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.as_str())),
        Some(other) => Err(GrammarError::malformed(
            ctx,
            format!("'{key}' must be a string, found {other}"),
        )),
    }
}
