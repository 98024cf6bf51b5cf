use super::{Data, Exception, GetType, Object};
use crate::BinaryOp;
use std::{cmp::Ordering, mem};

fn as_int(data: &Data) -> Option<i64> {
    match data {
        Data::Int(i) => Some(*i),
        Data::Bool(b) => Some(*b as i64),
        _ => None,
    }
}

fn as_float(data: &Data) -> Option<f64> {
    match data {
        Data::Float(x) => Some(*x),
        _ => as_int(data).map(|i| i as f64),
    }
}

/// Length of `len` elements repeated `count` times, bounded by the largest
/// buffer of `T` that can be allocated.
fn repeated_len<T>(len: usize, count: usize) -> Result<usize, Exception> {
    let max = isize::MAX as usize / mem::size_of::<T>().max(1);
    len.checked_mul(count)
        .filter(|&total| total <= max)
        .ok_or_else(|| Exception::OverflowError("repeated sequence is too long".to_owned()))
}

fn repeat<T: Clone>(items: &[T], count: i64) -> Result<Vec<T>, Exception> {
    let count = usize::try_from(count).unwrap_or(0);
    let mut out = Vec::new();
    if items.is_empty() || count == 0 {
        return Ok(out);
    }
    out.try_reserve_exact(repeated_len::<T>(items.len(), count)?)
        .map_err(|_| Exception::MemoryError)?;
    for _ in 0..count {
        out.extend_from_slice(items);
    }
    Ok(out)
}

fn repeat_str(s: &str, count: i64) -> Result<String, Exception> {
    let count = usize::try_from(count).unwrap_or(0);
    let mut out = String::new();
    if s.is_empty() || count == 0 {
        return Ok(out);
    }
    out.try_reserve_exact(repeated_len::<u8>(s.len(), count)?)
        .map_err(|_| Exception::MemoryError)?;
    for _ in 0..count {
        out.push_str(s);
    }
    Ok(out)
}

fn unsupported(op: BinaryOp, lhs: &Data, rhs: &Data) -> Exception {
    Exception::TypeError(format!(
        "unsupported operand type(s) for {}: '{}' and '{}'",
        op.symbol(),
        lhs.get_type(),
        rhs.get_type()
    ))
}

pub(super) fn binary_op(lhs: &Object, op: BinaryOp, rhs: &Object) -> Result<Object, Exception> {
    let lhs = lhs.0.borrow();
    let rhs = rhs.0.borrow();

    if let (Some(a), Some(b)) = (as_int(&lhs), as_int(&rhs)) {
        let result = match op {
            BinaryOp::Add => a.checked_add(b),
            BinaryOp::Sub => a.checked_sub(b),
            BinaryOp::Mul => a.checked_mul(b),
        };
        return result
            .map(Object::from)
            .ok_or_else(|| Exception::OverflowError("integer result too large".to_owned()));
    }

    if let (Some(a), Some(b)) = (as_float(&lhs), as_float(&rhs)) {
        return Ok(Object::from(match op {
            BinaryOp::Add => a + b,
            BinaryOp::Sub => a - b,
            BinaryOp::Mul => a * b,
        }));
    }

    let data = match (op, &*lhs, &*rhs) {
        (BinaryOp::Add, Data::Str(a), Data::Str(b)) => Data::Str([a.as_str(), b.as_str()].concat()),
        (BinaryOp::Add, Data::List(a), Data::List(b)) => Data::List([&a[..], &b[..]].concat()),
        (BinaryOp::Add, Data::Tuple(a), Data::Tuple(b)) => Data::Tuple([&a[..], &b[..]].concat()),
        (BinaryOp::Mul, seq, count) | (BinaryOp::Mul, count, seq) if as_int(count).is_some() => {
            let count = as_int(count).unwrap_or(0);
            match seq {
                Data::Str(s) => Data::Str(repeat_str(s, count)?),
                Data::List(items) => Data::List(repeat(items, count)?),
                Data::Tuple(items) => Data::Tuple(repeat(items, count)?),
                _ => return Err(unsupported(op, &lhs, &rhs)),
            }
        }
        _ => return Err(unsupported(op, &lhs, &rhs)),
    };
    Ok(Object::new(data))
}

fn compare_items(lhs: &[Object], rhs: &[Object]) -> Result<Ordering, Exception> {
    for (a, b) in lhs.iter().zip(rhs) {
        match compare(a, b)? {
            Ordering::Equal => {}
            ordering => return Ok(ordering),
        }
    }
    Ok(lhs.len().cmp(&rhs.len()))
}

pub(super) fn compare(lhs: &Object, rhs: &Object) -> Result<Ordering, Exception> {
    let lhs = lhs.0.borrow();
    let rhs = rhs.0.borrow();

    if let (Some(a), Some(b)) = (as_int(&lhs), as_int(&rhs)) {
        return Ok(a.cmp(&b));
    }
    if let (Some(a), Some(b)) = (as_float(&lhs), as_float(&rhs)) {
        // NaN is unordered; treat it as equal so sorting stays total.
        return Ok(a.partial_cmp(&b).unwrap_or(Ordering::Equal));
    }

    match (&*lhs, &*rhs) {
        (Data::Str(a), Data::Str(b)) => Ok(a.cmp(b)),
        (Data::List(a), Data::List(b)) | (Data::Tuple(a), Data::Tuple(b)) => compare_items(a, b),
        (a, b) => Err(Exception::TypeError(format!(
            "'<' not supported between instances of '{}' and '{}'",
            a.get_type(),
            b.get_type()
        ))),
    }
}

pub(super) fn equals(lhs: &Object, rhs: &Object) -> bool {
    let lhs = lhs.0.borrow();
    let rhs = rhs.0.borrow();

    if let (Some(a), Some(b)) = (as_float(&lhs), as_float(&rhs)) {
        return match (as_int(&lhs), as_int(&rhs)) {
            (Some(a), Some(b)) => a == b,
            _ => a == b,
        };
    }

    match (&*lhs, &*rhs) {
        (Data::None, Data::None) => true,
        (Data::Str(a), Data::Str(b)) => a == b,
        (Data::List(a), Data::List(b)) | (Data::Tuple(a), Data::Tuple(b)) => a == b,
        (Data::Dict(a), Data::Dict(b)) => a == b,
        _ => false,
    }
}
