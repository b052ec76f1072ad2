//! Conversion of engine failures into the plain-text messages stored by an
//! [`ExecutionContext`](crate::ExecutionContext).

use crate::quickjs::{convert::Coerced, Ctx, Error as JSError, Value};
use std::any::Any;

/// Renders an engine error as a plain message.
///
/// If `error` signals a thrown exception, the pending value is taken from
/// `cx`, so the context no longer has an exception pending afterwards.
pub fn error_message(cx: &Ctx<'_>, error: JSError) -> String {
    if !error.is_exception() {
        return error.to_string();
    }

    pending_exception_message(cx)
}

/// Takes the exception pending in `cx` and renders it as a plain message.
pub(crate) fn pending_exception_message(cx: &Ctx<'_>) -> String {
    let value = cx.catch();
    match value.clone().into_exception() {
        Some(exception) => exception.to_string(),
        None => thrown_value_message(cx, value),
    }
}

fn thrown_value_message<'js>(cx: &Ctx<'js>, value: Value<'js>) -> String {
    if let Some(symbol) = value.as_symbol() {
        let description = symbol
            .description()
            .ok()
            .and_then(Value::into_string)
            .and_then(|description| description.to_string().ok());
        return match description {
            Some(description) => format!("Symbol({description})"),
            None => {
                let _ = cx.catch();
                "Symbol()".to_string()
            }
        };
    }

    match value.get::<Coerced<String>>() {
        Ok(coerced) => coerced.0,
        Err(_) => {
            // Coercion can throw again; that exception must not stay pending.
            let _ = cx.catch();
            "uncaught exception".to_string()
        }
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        format!("initializer panicked: {msg}")
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        format!("initializer panicked: {msg}")
    } else {
        "initializer panicked".to_string()
    }
}
