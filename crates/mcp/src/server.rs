use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::protocol::{
    JsonRpcRequest, JsonRpcResponse, ToolCallParams, INVALID_PARAMS, INVALID_REQUEST, JSONRPC_VERSION,
    METHOD_NOT_FOUND, PARSE_ERROR, PROTOCOL_VERSION,
};
use crate::tools::{tool_definitions, Toolbox};

pub const SERVER_NAME: &str = "larder";

/// Line-delimited JSON-RPC over a reader/writer pair. Returns when the reader
/// reaches end of input.
pub async fn serve<R, W>(toolbox: &Toolbox, reader: R, mut writer: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut reader = reader;
    let mut buf = Vec::with_capacity(8192);

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }

        let reply = match std::str::from_utf8(&buf) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                handle_message(toolbox, trimmed).await
            }
            Err(e) => {
                tracing::warn!("Message is not valid UTF-8: {e}");
                encode(JsonRpcResponse::failure(Value::Null, PARSE_ERROR, format!("Parse error: {e}")))
            }
        };

        if let Some(reply) = reply {
            writer.write_all(reply.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }
    }

    tracing::info!("Input closed, shutting down");
    Ok(())
}

/// Handle one JSON-RPC message. `None` for notifications.
pub async fn handle_message(toolbox: &Toolbox, line: &str) -> Option<String> {
    let raw: Value = match serde_json::from_str(line) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!("Unparseable message: {e}");
            return encode(JsonRpcResponse::failure(Value::Null, PARSE_ERROR, format!("Parse error: {e}")));
        }
    };
    let request: JsonRpcRequest = match serde_json::from_value(raw) {
        Ok(r) => r,
        Err(e) => {
            return encode(JsonRpcResponse::failure(
                Value::Null,
                INVALID_REQUEST,
                format!("Invalid request: {e}"),
            ));
        }
    };
    if !request.jsonrpc.is_empty() && request.jsonrpc != JSONRPC_VERSION {
        tracing::debug!("Client sent jsonrpc={}", request.jsonrpc);
    }

    let Some(id) = request.id else {
        tracing::debug!("Notification {}", request.method);
        return None;
    };

    let response = match request.method.as_str() {
        "initialize" => JsonRpcResponse::success(
            id,
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {"tools": {}},
                "serverInfo": {"name": SERVER_NAME, "version": env!("CARGO_PKG_VERSION")}
            }),
        ),
        "ping" => JsonRpcResponse::success(id, json!({})),
        "tools/list" => JsonRpcResponse::success(id, json!({"tools": tool_definitions()})),
        "tools/call" => call_tool(toolbox, id, request.params).await,
        other => {
            tracing::warn!("Unknown method {other}");
            JsonRpcResponse::failure(id, METHOD_NOT_FOUND, format!("Method not found: {other}"))
        }
    };
    encode(response)
}

async fn call_tool(toolbox: &Toolbox, id: Value, params: Value) -> JsonRpcResponse {
    let params: ToolCallParams = match serde_json::from_value(params) {
        Ok(p) => p,
        Err(e) => return JsonRpcResponse::failure(id, INVALID_PARAMS, format!("Invalid params: {e}")),
    };

    let Some(reply) = toolbox.call(&params.name, params.arguments).await else {
        return JsonRpcResponse::failure(id, INVALID_PARAMS, format!("Unknown tool: {}", params.name));
    };

    let is_error = reply["status"] == "error";
    JsonRpcResponse::success(
        id,
        json!({
            "content": [{"type": "text", "text": reply.to_string()}],
            "isError": is_error
        }),
    )
}

fn encode(response: JsonRpcResponse) -> Option<String> {
    match serde_json::to_string(&response) {
        Ok(s) => Some(s),
        Err(e) => {
            tracing::error!("Failed to encode response: {e}");
            None
        }
    }
}
