//! Páginas de resultado do fluxo OAuth
//!
//! Camada de apresentação separada da máquina de estados: recebe o
//! resultado estruturado do callback e formata em HTML.

use axum::response::Html;

use super::config::scope_param;
use super::handlers::CallbackFailure;
use super::TokenResponse;

/// Renderizar página de sucesso com os tokens obtidos
///
/// Os tokens são exibidos uma única vez e não ficam armazenados no servidor.
pub fn render_success_page(tokens: &TokenResponse) -> Html<String> {
    let refresh_token_html = tokens
        .refresh_token
        .as_deref()
        .map(|refresh_token| {
            format!(
                r#"
                <div class="info-box">
                    <div class="info-label">Refresh Token:</div>
                    <div class="info-value" id="refresh-token">{}</div>
                    <button class="copy-btn" onclick="copyToClipboard('refresh-token')">📋 Copiar</button>
                </div>
                "#,
                refresh_token
            )
        })
        .unwrap_or_default();

    let expires_html = tokens
        .expires_in
        .map(|secs| format!("{} segundos ({} horas)", secs, secs / 3600))
        .unwrap_or_else(|| "N/A".to_string());

    Html(format!(
        r#"
        <!DOCTYPE html>
        <html>
        <head>
            <title>TikTok OAuth - Sucesso</title>
            <meta charset="UTF-8">
            <style>
                body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Arial, sans-serif;
                       max-width: 800px; margin: 50px auto; padding: 20px; background: #f5f5f5; }}
                .container {{ background: white; padding: 30px; border-radius: 12px; box-shadow: 0 2px 10px rgba(0,0,0,0.1); }}
                .success {{ background: #d4edda; border: 2px solid #28a745; padding: 20px; border-radius: 8px; margin-bottom: 20px; }}
                .info-box {{ background: #f8f9fa; padding: 20px; border-radius: 8px; margin: 20px 0; border-left: 4px solid #00f2ea; }}
                .info-label {{ font-weight: bold; color: #333; margin-bottom: 5px; font-size: 14px; }}
                .info-value {{ background: white; padding: 12px; border-radius: 5px; word-break: break-all;
                              font-family: 'Courier New', monospace; font-size: 13px; color: #666; }}
                .copy-btn {{ background: #00f2ea; color: white; padding: 8px 16px; border: none;
                            border-radius: 5px; cursor: pointer; font-size: 12px; margin-top: 8px; }}
                .copy-btn:hover {{ background: #00d4cc; }}
                .warning {{ background: #fff3cd; border-left: 4px solid #ffc107; color: #856404;
                           padding: 15px; border-radius: 5px; margin-top: 20px; }}
                .back-btn {{ display: block; text-align: center; background: #667eea; color: white;
                            padding: 12px 24px; border-radius: 8px; text-decoration: none; margin-top: 30px; }}
                h1 {{ color: #28a745; margin-top: 0; }}
            </style>
            <script>
                function copyToClipboard(elementId) {{
                    const element = document.getElementById(elementId);
                    navigator.clipboard.writeText(element.textContent);
                }}
            </script>
        </head>
        <body>
            <div class="container">
                <div class="success">
                    <h1>✅ Autorização concluída!</h1>
                    <p>O TikTok emitiu os tokens abaixo. Eles não ficam salvos no servidor.</p>
                </div>

                <div class="info-box">
                    <div class="info-label">Access Token:</div>
                    <div class="info-value" id="access-token">{access_token}</div>
                    <button class="copy-btn" onclick="copyToClipboard('access-token')">📋 Copiar</button>
                </div>
                {refresh_token_html}
                <div class="info-box">
                    <div class="info-label">Open ID:</div>
                    <div class="info-value">{open_id}</div>
                </div>

                <div class="info-box">
                    <div class="info-label">Token Type:</div>
                    <div class="info-value">{token_type}</div>
                </div>

                <div class="info-box">
                    <div class="info-label">Expira em:</div>
                    <div class="info-value">{expires}</div>
                </div>

                <div class="info-box">
                    <div class="info-label">Scopes:</div>
                    <div class="info-value">{scope}</div>
                </div>

                <div class="warning">
                    <strong>⚠️ Atenção:</strong> ambiente de teste. Não compartilhe este access token!
                </div>

                <a href="/auth/url" class="back-btn">🏠 Recomeçar o fluxo</a>
            </div>
        </body>
        </html>
        "#,
        access_token = tokens.access_token,
        refresh_token_html = refresh_token_html,
        open_id = tokens.open_id.as_deref().unwrap_or("N/A"),
        token_type = tokens.token_type.as_deref().unwrap_or("Bearer"),
        expires = expires_html,
        // O scope retornado pelo provider é autoritativo; fallback para o solicitado
        scope = tokens.scope.as_deref().unwrap_or_else(|| scope_param()),
    ))
}

/// Escapar texto vindo do provider antes de embutir no HTML
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Renderizar página de falha com o motivo e um link para recomeçar
pub fn render_failure_page(failure: &CallbackFailure) -> Html<String> {
    let detail_html = failure
        .detail
        .as_deref()
        .map(|detail| {
            format!(
                r#"<p><strong>Detalhe:</strong></p>
                <pre>{}</pre>"#,
                escape_html(detail)
            )
        })
        .unwrap_or_default();

    Html(format!(
        r#"
        <!DOCTYPE html>
        <html>
        <head>
            <title>TikTok OAuth - Erro</title>
            <meta charset="UTF-8">
            <style>
                body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Arial, sans-serif;
                       max-width: 600px; margin: 50px auto; padding: 20px; background: #f5f5f5; }}
                .container {{ background: white; padding: 30px; border-radius: 12px; box-shadow: 0 2px 10px rgba(0,0,0,0.1); }}
                .error {{ background: #f8d7da; border: 2px solid #dc3545; padding: 20px; border-radius: 8px; }}
                pre {{ background: #f8f9fa; padding: 15px; border-radius: 5px; overflow-x: auto; }}
                h1 {{ color: #721c24; margin-top: 0; }}
                a {{ color: #007bff; text-decoration: none; font-weight: bold; }}
                a:hover {{ text-decoration: underline; }}
            </style>
        </head>
        <body>
            <div class="container">
                <div class="error">
                    <h1>❌ Erro na autorização</h1>
                    <p>{reason}</p>
                    {detail_html}
                    <p><a href="/auth/url">← Tentar novamente</a></p>
                </div>
            </div>
        </body>
        </html>
        "#,
        reason = failure.reason,
        detail_html = detail_html,
    ))
}
