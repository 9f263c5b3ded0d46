use crate::models::{IDLE_MESSAGE, PREVIEW_ROW_LIMIT, UPLOAD_FIELD};

const PAGE_TEMPLATE: &str = r##"<!doctype html>
<html lang="pt-BR">
<head>
<meta charset="utf-8">
<title>Conversor PDF → Excel</title>
<style>
body { font-family: sans-serif; max-width: 46rem; margin: 2rem auto; padding: 0 1rem; }
.status { padding: .75rem 1rem; border-radius: .4rem; margin: 1rem 0; }
.info { background: #e8f0fe; } .success { background: #e6f4ea; }
.warning { background: #fef7e0; } .error { background: #fce8e6; }
table { border-collapse: collapse; width: 100%; } td, th { border: 1px solid #ccc; padding: .25rem .5rem; }
</style>
</head>
<body>
<h1>Conversor de Contrato PDF → Excel (Unificado)</h1>
<p>Esta ferramenta extrai todas as tabelas contendo <b>CÓDIGO | DESCRIÇÃO | VALOR</b>
de contratos em PDF e une tudo em uma única tabela Excel.</p>
<form id="upload">
<input type="file" name="{{FIELD}}" accept="application/pdf,.pdf" required>
<button type="submit">Processar</button>
</form>
<div id="status" class="status info">{{IDLE}}</div>
<div id="result"></div>
<script>
const form = document.getElementById("upload");
const statusBox = document.getElementById("status");
const result = document.getElementById("result");
function show(kind, text) { statusBox.className = "status " + kind; statusBox.textContent = text; }
form.addEventListener("submit", async (event) => {
  event.preventDefault();
  result.replaceChildren();
  show("info", "Processando o PDF...");
  const data = new FormData(form);
  const reply = await fetch("/api/v1/preview", { method: "POST", body: data });
  const body = await reply.json();
  if (!reply.ok) { show("error", body.message); return; }
  if (body.status === "empty") { show("warning", body.message); return; }
  show("success", body.message);
  const table = document.createElement("table");
  const head = table.insertRow();
  body.columns.forEach((name) => { const th = document.createElement("th"); th.textContent = name; head.appendChild(th); });
  body.preview.forEach((row) => {
    const tr = table.insertRow();
    [row.code, row.description, row.value].forEach((v) => { tr.insertCell().textContent = v; });
  });
  const caption = document.createElement("p");
  caption.textContent = "Primeiras {{LIMIT}} linhas:";
  const download = document.createElement("button");
  download.textContent = "Baixar Excel Unificado";
  download.addEventListener("click", async () => {
    const file = await fetch("/api/v1/xlsx", { method: "POST", body: new FormData(form) });
    if (!file.ok) { show("error", (await file.json()).message); return; }
    const link = document.createElement("a");
    link.href = URL.createObjectURL(await file.blob());
    link.download = "tabelas_unificadas.xlsx";
    link.click();
  });
  result.append(caption, table, download);
});
</script>
</body>
</html>
"##;

#[must_use]
pub fn upload_page() -> String {
    PAGE_TEMPLATE
        .replace("{{FIELD}}", UPLOAD_FIELD)
        .replace("{{IDLE}}", IDLE_MESSAGE)
        .replace("{{LIMIT}}", &PREVIEW_ROW_LIMIT.to_string())
}
