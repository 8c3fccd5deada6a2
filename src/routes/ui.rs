use axum::{response::Html, routing::get, Router};

pub fn router() -> Router {
    Router::new().route("/", get(index))
}

async fn index() -> Html<&'static str> {
    Html(r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>Reasoning-lab</title>
  <style>
    body { font-family: Arial, sans-serif; margin: 0; color: #1d1d1f; display: flex; min-height: 100vh; }
    aside { width: 260px; background: #f4f5f7; padding: 1.5rem; box-sizing: border-box; }
    main { flex: 1; padding: 2rem; max-width: 900px; }
    h1 { margin-top: 0; }
    label { display: block; margin-top: 0.75rem; font-weight: 600; }
    input, select, textarea { width: 100%; padding: 0.5rem; box-sizing: border-box; }
    button { margin-top: 1rem; padding: 0.6rem 1rem; }
    .panel { display: none; }
    .panel.active { display: block; }
    .row { display: flex; gap: 1rem; }
    .row > div { flex: 1; }
    details { border: 1px solid #ddd; border-radius: 8px; padding: 0.75rem; margin-bottom: 0.75rem; }
    summary { font-weight: 700; cursor: pointer; }
    .msg { border-radius: 8px; padding: 0.75rem; margin-bottom: 0.5rem; white-space: pre-wrap; }
    .msg.user { background: #e8f0fe; }
    .msg.assistant { background: #f6f8fa; }
    .output { white-space: pre-wrap; background: #f6f8fa; padding: 1rem; border-radius: 8px; }
    .error { color: #b00020; }
    .hint { color: #666; font-size: 0.85rem; }
  </style>
</head>
<body>
  <aside>
    <label for="mode">Select a function</label>
    <select id="mode">
      <option value="search">Search Articles</option>
      <option value="pdf">PDF Analysis</option>
      <option value="experiment">Hypothetical Experiments</option>
      <option value="chat">Reasoning Chat</option>
    </select>
    <label for="tokenBudget">Max tokens for <span id="deepModelName">deep</span> model</label>
    <input id="tokenBudget" type="number" min="1000" step="100" value="6000" />
    <div class="hint">Increase max tokens if no response is found</div>
    <div id="budgetStatus" class="hint"></div>
  </aside>

  <main>
    <h1>Reasoning-lab: Explore, experiment and find scientific solutions</h1>
    <div id="error" class="error"></div>

    <section id="panel-search" class="panel active">
      <h2>Search Scientific Articles</h2>
      <label for="searchQuery">Enter your search query</label>
      <input id="searchQuery" />
      <div class="row">
        <div>
          <label for="maxResults">Max results</label>
          <input id="maxResults" type="number" min="1" max="20" step="1" value="5" />
        </div>
        <div>
          <label for="sortBy">Sort by</label>
          <select id="sortBy">
            <option value="relevance">Relevance</option>
            <option value="lastUpdatedDate">Last Updated Date</option>
            <option value="submittedDate">Submitted Date</option>
          </select>
        </div>
      </div>
      <button id="searchBtn">Search</button>
      <div id="searchResults"></div>
    </section>

    <section id="panel-pdf" class="panel">
      <h2>PDF Analysis</h2>
      <input id="pdfInput" type="file" accept="application/pdf,.pdf" />
      <div id="pdfOutput"></div>
    </section>

    <section id="panel-experiment" class="panel">
      <h2>Create Hypothetical Experiments</h2>
      <label for="expTopic">Enter a topic for the hypothetical experiment</label>
      <input id="expTopic" />
      <button id="expBtn">Generate Experiment</button>
      <div id="expOutput"></div>
    </section>

    <section id="panel-chat" class="panel">
      <h2>Reasoning Chat</h2>
      <div id="chatLog"></div>
      <textarea id="chatInput" rows="3" placeholder="What is up?"></textarea>
      <button id="chatBtn">Send</button>
    </section>
  </main>

  <script>
    let sessionId = sessionStorage.getItem('reasoningLabSession');
    const $ = (id) => document.getElementById(id);

    function escapeHtml(text) {
      const div = document.createElement('div');
      div.textContent = text;
      return div.innerHTML;
    }

    async function api(method, path, body, isForm) {
      const headers = { 'x-session-id': sessionId };
      if (body && !isForm) headers['Content-Type'] = 'application/json';
      const res = await fetch(path, {
        method,
        headers,
        body: body ? (isForm ? body : JSON.stringify(body)) : undefined
      });
      if (res.status === 204) return null;
      const json = await res.json();
      if (!res.ok) throw new Error(json.error || res.statusText);
      return json;
    }

    async function ensureSession() {
      if (sessionId) {
        try {
          return await api('GET', '/api/session');
        } catch (e) {
          sessionId = null;
        }
      }
      const res = await fetch('/api/session', { method: 'POST' });
      const snapshot = await res.json();
      sessionId = snapshot.session_id;
      sessionStorage.setItem('reasoningLabSession', sessionId);
      return snapshot;
    }

    function showError(e) { $('error').textContent = e ? e.message : ''; }

    function renderResults(results) {
      if (!results.length) { $('searchResults').innerHTML = ''; return; }
      $('searchResults').innerHTML = '<h3>Results</h3>' + results.map((r, i) => `
        <details>
          <summary>${i + 1}. ${escapeHtml(r.title)}</summary>
          <p><b>Authors</b>: ${escapeHtml(r.authors)}</p>
          <p><b>Published</b>: ${r.published}</p>
          <p><b>Updated</b>: ${r.updated}</p>
          <p><b>Summary</b>: ${escapeHtml(r.summary)}</p>
          <p><a href="${encodeURI(r.url)}" target="_blank" rel="noopener">PDF Link</a></p>
        </details>`).join('');
    }

    function renderAnalysis(a) {
      $('pdfOutput').innerHTML = a
        ? `<h3>PDF Analysis:</h3><div class="output">${escapeHtml(a.summary)}</div>`
        : '';
    }

    function renderExperiment(e) {
      $('expOutput').innerHTML = e
        ? `<h3>Hypothetical Experiment:</h3><div class="output">${escapeHtml(e.text)}</div>`
        : '';
    }

    function renderChat(messages) {
      $('chatLog').innerHTML = messages.map(m =>
        `<div class="msg ${m.role}">${escapeHtml(m.content)}${m.model ? `\n\n<b>Model Used:</b> ${escapeHtml(m.model)}` : ''}</div>`
      ).join('');
    }

    let chatMessages = [];

    async function renderMode(mode) {
      document.querySelectorAll('.panel').forEach(p => p.classList.remove('active'));
      $('panel-' + mode).classList.add('active');
      showError(null);
      try {
        if (mode === 'search') renderResults((await api('GET', '/api/search')).results);
        if (mode === 'pdf') renderAnalysis(await api('GET', '/api/pdf'));
        if (mode === 'experiment') renderExperiment(await api('GET', '/api/experiment'));
        if (mode === 'chat') {
          chatMessages = (await api('GET', '/api/chat')).messages;
          renderChat(chatMessages);
        }
      } catch (e) { showError(e); }
    }

    $('mode').addEventListener('change', (e) => renderMode(e.target.value));

    $('tokenBudget').addEventListener('change', async (e) => {
      try {
        const snapshot = await api('PUT', '/api/session/token-budget', { token_budget: Number(e.target.value) });
        $('budgetStatus').textContent = `Budget set to ${snapshot.token_budget}`;
        showError(null);
      } catch (err) { showError(err); }
    });

    $('searchBtn').addEventListener('click', async () => {
      showError(null);
      $('searchResults').textContent = 'Searching...';
      try {
        const res = await api('POST', '/api/search', {
          query: $('searchQuery').value,
          max_results: Number($('maxResults').value),
          sort_by: $('sortBy').value
        });
        renderResults(res.results);
      } catch (e) { $('searchResults').textContent = ''; showError(e); }
    });

    $('pdfInput').addEventListener('change', async () => {
      const file = $('pdfInput').files[0];
      if (!file) return;
      showError(null);
      $('pdfOutput').textContent = 'Analyzing...';
      const form = new FormData();
      form.append('file', file);
      try { renderAnalysis(await api('POST', '/api/pdf', form, true)); }
      catch (e) { $('pdfOutput').textContent = ''; showError(e); }
    });

    $('expBtn').addEventListener('click', async () => {
      showError(null);
      $('expOutput').textContent = 'Generating...';
      try { renderExperiment(await api('POST', '/api/experiment', { topic: $('expTopic').value })); }
      catch (e) { $('expOutput').textContent = ''; showError(e); }
    });

    $('chatBtn').addEventListener('click', async () => {
      const message = $('chatInput').value;
      if (!message.trim()) return;
      showError(null);
      chatMessages.push({ role: 'user', content: message });
      renderChat(chatMessages);
      $('chatInput').value = '';
      try {
        const turn = await api('POST', '/api/chat', { message });
        chatMessages.push({ role: 'assistant', content: turn.reply, model: turn.model_used });
        renderChat(chatMessages);
      } catch (e) {
        chatMessages.pop();
        renderChat(chatMessages);
        showError(e);
      }
    });

    ensureSession().then(snapshot => {
      $('tokenBudget').value = snapshot.token_budget;
      $('tokenBudget').min = snapshot.min_token_budget;
      $('deepModelName').textContent = snapshot.deep_model;
      renderMode($('mode').value);
    }).catch(showError);
  </script>
</body>
</html>"#)
}
