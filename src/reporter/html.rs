//! HTML reporter: generates a self-contained interactive dashboard
//!
//! Embeds the normalized run as JSON and renders everything client-side
//! with vanilla JS: KPI cards, status and per-suite charts, a sortable,
//! filterable, searchable test table, and a per-test detail modal.

use crate::normalizer::NormalizedRun;

/// Escapes a string for embedding inside a script block
fn escape_json_for_script(s: &str) -> String {
    // serde_json already escapes quotes/backslashes; we just need to ensure
    // no </script> can appear inside the block.
    s.replace("</script>", "<\\/script>")
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#039;")
}

/// Reporter that generates a self-contained HTML dashboard
pub struct HtmlReporter {
    title: String,
}

impl HtmlReporter {
    pub fn new() -> Self {
        Self {
            title: "Rundown".to_string(),
        }
    }

    /// Override the dashboard title
    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    /// Generate the full HTML report
    pub fn report(&self, run: &NormalizedRun) -> String {
        let data_json = serde_json::to_string(run).unwrap_or_else(|_| "{}".to_string());

        let mut html = String::with_capacity(32_768);
        html.push_str(&Self::template_head().replace("{{TITLE}}", &escape_html(&self.title)));
        html.push_str("<script>const DATA=");
        html.push_str(&escape_json_for_script(&data_json));
        html.push_str(";</script>\n");
        html.push_str(&Self::template_body().replace("{{TITLE}}", &escape_html(&self.title)));
        html.push_str(Self::template_script());
        html.push_str("</body>\n</html>");
        html
    }

    // ─── HTML template pieces ────────────────────────────────────────────

    fn template_head() -> &'static str {
        r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{{TITLE}} – Test Run Dashboard</title>
<style>
:root{--bg:#0d0d11;--surface:#16161b;--surface2:#1e1e24;--border:#2a2a32;--text:#e4e4e7;--muted:#71717a;--green:#22c55e;--yellow:#eab308;--orange:#f97316;--red:#ef4444;--blue:#3b82f6;--radius:8px}
*{box-sizing:border-box;margin:0;padding:0}
body{font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',Roboto,Oxygen,sans-serif;background:var(--bg);color:var(--text);line-height:1.5;min-height:100vh}
::selection{background:var(--blue);color:#fff}

/* ── Layout ── */
.shell{display:grid;grid-template-columns:1fr 300px;grid-template-rows:auto auto auto 1fr;gap:0;min-height:100vh}
@media(max-width:960px){.shell{grid-template-columns:1fr;}}
header{grid-column:1/-1;padding:1.25rem 1.5rem;border-bottom:1px solid var(--border);display:flex;align-items:center;gap:1.5rem;flex-wrap:wrap}
header h1{font-size:1.125rem;font-weight:700;white-space:nowrap}
header .meta{font-size:.8125rem;color:var(--muted)}
.fixture-note{grid-column:1/-1;padding:.5rem 1.5rem;background:rgba(234,179,8,.12);color:var(--yellow);font-size:.8125rem;border-bottom:1px solid var(--border)}

/* ── Stats bar ── */
.stats-bar{grid-column:1/-1;display:flex;gap:0;border-bottom:1px solid var(--border);background:var(--surface);flex-wrap:wrap}
.stat{flex:1;min-width:120px;padding:.875rem 1.25rem;border-right:1px solid var(--border);text-align:center}
.stat:last-child{border-right:none}
.stat .val{font-size:1.5rem;font-weight:700;display:block}
.stat .sub{font-size:.6875rem;color:var(--muted)}
.stat .lbl{font-size:.75rem;color:var(--muted);text-transform:uppercase;letter-spacing:.5px}
.rate-bar{height:5px;background:var(--border);border-radius:3px;margin-top:4px;overflow:hidden}
.rate-bar span{display:block;height:100%;border-radius:3px}

/* ── Controls ── */
.controls{grid-column:1;padding:1rem 1.5rem;border-bottom:1px solid var(--border);display:flex;gap:.75rem;flex-wrap:wrap;align-items:center}
.search{background:var(--surface);border:1px solid var(--border);border-radius:var(--radius);padding:.5rem .75rem;color:var(--text);font-size:.8125rem;width:220px;outline:none;transition:border-color .15s}
.search:focus{border-color:var(--blue)}
.search::placeholder{color:var(--muted)}
.pill-group{display:flex;gap:2px;background:var(--surface);border-radius:var(--radius);padding:2px;border:1px solid var(--border)}
.pill{padding:.3rem .7rem;font-size:.75rem;font-weight:600;border-radius:6px;cursor:pointer;border:none;background:transparent;color:var(--muted);transition:all .15s}
.pill:hover{color:var(--text)}
.pill.active{background:var(--surface2);color:var(--text);box-shadow:0 1px 3px rgba(0,0,0,.3)}
.pill[data-status="passed"].active{color:var(--green)}
.pill[data-status="failed"].active{color:var(--red)}
.pill[data-status="skipped"].active{color:var(--yellow)}
.pill[data-status="unknown"].active{color:var(--orange)}
.pill .cnt{font-weight:400;opacity:.7;margin-left:3px}
.count-badge{font-size:.75rem;color:var(--muted);margin-left:auto;white-space:nowrap}

/* ── Main + Sidebar ── */
.main{grid-column:1;padding:1rem 1.5rem;overflow-y:auto}
.sidebar{grid-column:2;grid-row:3/5;border-left:1px solid var(--border);padding:1rem 1.25rem;overflow-y:auto;background:var(--surface)}
@media(max-width:960px){
  .sidebar{grid-column:1;grid-row:auto;border-left:none;border-top:1px solid var(--border)}
  .controls{grid-column:1}
}

/* ── Sidebar sections ── */
.sb-section{margin-bottom:1.5rem}
.sb-section h3{font-size:.75rem;text-transform:uppercase;letter-spacing:.5px;color:var(--muted);margin-bottom:.5rem;padding-bottom:.375rem;border-bottom:1px solid var(--border)}
.sb-item{display:flex;justify-content:space-between;align-items:center;padding:.3rem 0;font-size:.8125rem}
.sb-item .name{color:var(--text);overflow:hidden;text-overflow:ellipsis;white-space:nowrap;max-width:180px}
.sb-item .cnt{color:var(--muted);font-variant-numeric:tabular-nums;font-size:.75rem}
.sb-bar{height:5px;background:var(--border);border-radius:2px;margin-top:2px;display:flex;overflow:hidden}
.sb-bar span{display:block;height:100%}

/* ── Test table ── */
table{width:100%;border-collapse:collapse;font-size:.8125rem}
thead th{text-align:left;padding:.5rem .75rem;color:var(--muted);font-size:.6875rem;text-transform:uppercase;letter-spacing:.5px;border-bottom:1px solid var(--border);cursor:pointer;user-select:none;white-space:nowrap}
thead th:hover{color:var(--text)}
thead th .arrow{margin-left:4px;font-size:.625rem}
tbody tr{border-bottom:1px solid var(--border);cursor:pointer;transition:background .1s}
tbody tr:hover{background:var(--surface2)}
tbody td{padding:.5rem .75rem;vertical-align:top}
.t-title{color:var(--text)}
.t-title small{display:block;color:var(--yellow);font-size:.6875rem}
.t-suite{color:var(--muted);white-space:nowrap}
.t-duration{font-variant-numeric:tabular-nums;white-space:nowrap;text-align:right;color:var(--muted)}
.status-badge{display:inline-flex;align-items:center;gap:4px;font-size:.6875rem;font-weight:700;padding:.125rem .5rem;border-radius:10px;text-transform:capitalize;white-space:nowrap}
.status-passed{background:rgba(34,197,94,.15);color:var(--green)}
.status-failed{background:rgba(239,68,68,.15);color:var(--red)}
.status-skipped{background:rgba(234,179,8,.12);color:var(--yellow)}
.status-unknown{background:rgba(249,115,22,.12);color:var(--orange)}

/* ── Modal ── */
.modal{display:none;position:fixed;inset:0;background:rgba(0,0,0,.6);z-index:10;align-items:center;justify-content:center;padding:1rem}
.modal.active{display:flex}
.modal-box{background:var(--surface);border:1px solid var(--border);border-radius:var(--radius);max-width:640px;width:100%;max-height:80vh;overflow-y:auto;padding:1.25rem}
.modal-box h4{font-size:.9375rem;margin-bottom:.75rem;padding-right:2rem}
.modal-close{position:absolute;margin-left:auto;float:right;background:none;border:none;color:var(--muted);font-size:1.25rem;cursor:pointer}
.modal-close:hover{color:var(--text)}
.detail-item{font-size:.8125rem;padding:.35rem 0;border-bottom:1px solid var(--border)}
.detail-item:last-child{border-bottom:none}
.detail-item strong{color:var(--muted);font-weight:600;margin-right:.5rem}
.detail-item code{font-family:'SF Mono',Consolas,monospace;font-size:.75rem;background:var(--surface2);padding:.1rem .375rem;border-radius:4px}
.error-box{margin-top:.75rem;background:rgba(239,68,68,.08);border:1px solid rgba(239,68,68,.3);border-radius:6px;padding:.75rem}
.error-box h5{color:var(--red);font-size:.75rem;text-transform:uppercase;letter-spacing:.5px;margin-bottom:.5rem}
.error-box pre{font-family:'SF Mono',Consolas,monospace;font-size:.6875rem;color:var(--muted);white-space:pre-wrap;word-break:break-word;margin-top:.5rem}

/* ── Empty state ── */
.empty{text-align:center;padding:3rem 1rem;color:var(--muted);font-size:.875rem}

/* ── Utility ── */
.c-green{color:var(--green)}.c-yellow{color:var(--yellow)}.c-orange{color:var(--orange)}.c-red{color:var(--red)}
.bg-green{background:var(--green)}.bg-yellow{background:var(--yellow)}.bg-orange{background:var(--orange)}.bg-red{background:var(--red)}
</style>
</head>
<body>
"##
    }

    fn template_body() -> &'static str {
        r##"<div class="shell">
  <header>
    <h1>{{TITLE}}</h1>
    <span class="meta" id="meta"></span>
  </header>
  <div class="fixture-note" id="fixture-note" style="display:none">
    No test report was found – this dashboard shows fixture data.
  </div>
  <div class="stats-bar" id="stats-bar"></div>
  <div class="controls" id="controls-area">
    <input type="search" class="search" id="search" placeholder="Search tests or suites…" autocomplete="off">
    <div class="pill-group" id="status-filter">
      <button class="pill active" data-status="all">All</button>
      <button class="pill" data-status="passed">Passed</button>
      <button class="pill" data-status="failed">Failed</button>
      <button class="pill" data-status="skipped">Skipped</button>
    </div>
    <span class="count-badge" id="count-badge"></span>
  </div>
  <div class="main" id="main"></div>
  <div class="sidebar" id="sidebar"></div>
</div>
<div class="modal" id="modal">
  <div class="modal-box" id="modal-box"></div>
</div>
"##
    }

    fn template_script() -> &'static str {
        r##"<script>
(function(){
"use strict";

/* ── helpers ── */
const $=s=>document.querySelector(s);
const $$=s=>[...document.querySelectorAll(s)];
const esc=s=>{const d=document.createElement('div');d.textContent=s;return d.innerHTML};
const ICONS={passed:'✓',failed:'✗',skipped:'⏭',unknown:'?'};
const fmtDur=ms=>{
  if(ms<1000) return ms+'ms';
  if(ms<60000) return (ms/1000).toFixed(2)+'s';
  return Math.floor(ms/60000)+'m '+((ms%60000)/1000).toFixed(0)+'s';
};
const fmtTs=ms=>new Date(ms).toLocaleString('en-US',{month:'short',day:'numeric',year:'numeric',hour:'2-digit',minute:'2-digit',second:'2-digit'});
const suiteTail=s=>s.split(' › ').pop();

/* ── state ── */
let activeStatus='all';
let query='';
let sort={col:null,dir:'asc'};

/* ── render stats ── */
function renderStats(){
  const g=DATA.global;
  const el=$('#stats-bar');
  const rateCol=g.passRate>=90?'var(--green)':g.passRate>=70?'var(--yellow)':'var(--red)';
  const pct=n=>g.total?Math.round(n/g.total*100):0;
  el.innerHTML=`
    <div class="stat"><span class="val">${g.total}</span><span class="lbl">Total</span></div>
    <div class="stat"><span class="val c-green">${g.passed}</span><span class="sub">${pct(g.passed)}%</span><span class="lbl">Passed</span></div>
    <div class="stat"><span class="val${g.failed>0?' c-red':''}">${g.failed}</span><span class="sub">${pct(g.failed)}%</span><span class="lbl">Failed</span></div>
    <div class="stat"><span class="val${g.skipped>0?' c-yellow':''}">${g.skipped}</span><span class="sub">${pct(g.skipped)}%</span><span class="lbl">Skipped</span></div>
    <div class="stat"><span class="val" style="color:${rateCol}">${g.passRate}%</span><div class="rate-bar"><span style="width:${g.passRate}%;background:${rateCol}"></span></div><span class="lbl">Pass rate</span></div>
    <div class="stat"><span class="val">${fmtDur(g.durationMs)}</span><span class="sub">avg ${fmtDur(g.avgDurationMs)}</span><span class="lbl">Duration</span></div>`;
  $('#meta').textContent=fmtTs(g.startTimeMs)+' – '+fmtTs(g.endTimeMs);
  if(DATA.source==='fixture') $('#fixture-note').style.display='block';
}

/* ── render sidebar ── */
function renderSidebar(){
  const g=DATA.global;

  /* status distribution */
  const dist=[['Passed',g.passed,'green'],['Failed',g.failed,'red'],['Skipped',g.skipped,'yellow'],['Unknown',g.unknown,'orange']];
  let distHtml='<div class="sb-section"><h3>Status Distribution</h3>';
  const maxD=Math.max(...dist.map(d=>d[1]),1);
  for(const[name,cnt,col] of dist){
    if(name==='Unknown'&&cnt===0) continue;
    const pct=Math.round(cnt/maxD*100);
    distHtml+=`<div class="sb-item"><span class="name">${name}</span><span class="cnt">${cnt}</span></div><div class="sb-bar"><span style="width:${pct}%" class="bg-${col}"></span></div>`;
  }
  distHtml+='</div>';

  /* per-suite stacked bars */
  let suiteHtml='<div class="sb-section"><h3>Results by Suite</h3>';
  for(const s of DATA.suites){
    if(!s.total) continue;
    const seg=(n,col)=>n?`<span style="width:${n/s.total*100}%" class="bg-${col}"></span>`:'';
    suiteHtml+=`<div class="sb-item"><span class="name" title="${esc(s.name)}">${esc(suiteTail(s.name))}</span><span class="cnt">${s.passed}/${s.total} · ${fmtDur(s.durationMs)}</span></div>`;
    suiteHtml+=`<div class="sb-bar">${seg(s.passed,'green')}${seg(s.failed,'red')}${seg(s.skipped,'yellow')}${seg(s.unknown,'orange')}</div>`;
  }
  if(!DATA.suites.length) suiteHtml+='<div class="sb-item"><span class="name" style="color:var(--muted)">No suites</span></div>';
  suiteHtml+='</div>';

  /* slowest tests */
  const slowest=[...DATA.tests].sort((a,b)=>b.durationMs-a.durationMs).slice(0,8);
  let slowHtml='<div class="sb-section"><h3>Slowest Tests</h3>';
  for(const t of slowest){
    slowHtml+=`<div class="sb-item"><span class="name" title="${esc(t.fullTitle)}">${esc(t.title)}</span><span class="cnt">${fmtDur(t.durationMs)}</span></div>`;
  }
  if(!slowest.length) slowHtml+='<div class="sb-item"><span class="name" style="color:var(--muted)">No tests</span></div>';
  slowHtml+='</div>';

  $('#sidebar').innerHTML=distHtml+suiteHtml+slowHtml;
}

/* ── filter + sort ── */
function getVisible(){
  let tests=DATA.tests;
  if(activeStatus!=='all') tests=tests.filter(t=>t.bucket===activeStatus);
  if(query){
    const q=query.toLowerCase();
    tests=tests.filter(t=>t.title.toLowerCase().includes(q)||t.suiteName.toLowerCase().includes(q));
  }
  if(sort.col){
    tests=[...tests].sort((a,b)=>{
      let av,bv;
      switch(sort.col){
        case 'name':av=a.title.toLowerCase();bv=b.title.toLowerCase();break;
        case 'suite':av=a.suiteName.toLowerCase();bv=b.suiteName.toLowerCase();break;
        case 'status':av=a.status;bv=b.status;break;
        case 'duration':av=a.durationMs;bv=b.durationMs;break;
        default:return 0;
      }
      if(av<bv) return sort.dir==='asc'?-1:1;
      if(av>bv) return sort.dir==='asc'?1:-1;
      return 0;
    });
  }
  return tests;
}

/* ── render table ── */
function render(){
  const tests=getVisible();
  $('#count-badge').textContent=tests.length+' of '+DATA.tests.length+' tests';

  const main=$('#main');
  if(!tests.length){
    main.innerHTML='<div class="empty">No tests match your filters.</div>';
    return;
  }

  const arrow=c=>sort.col===c?`<span class="arrow">${sort.dir==='asc'?'▲':'▼'}</span>`:'';
  let html=`<table><thead><tr>
    <th data-sort="name">Test${arrow('name')}</th>
    <th data-sort="suite">Suite${arrow('suite')}</th>
    <th data-sort="status">Status${arrow('status')}</th>
    <th data-sort="duration" style="text-align:right">Duration${arrow('duration')}</th>
  </tr></thead><tbody>`;
  for(const t of tests){
    html+=`<tr data-id="${esc(t.id)}">`;
    html+=`<td class="t-title">${esc(t.title)}${t.retryCount>0?`<small>Retried ${t.retryCount} time(s)</small>`:''}</td>`;
    html+=`<td class="t-suite" title="${esc(t.suiteName)}">${esc(suiteTail(t.suiteName))}</td>`;
    html+=`<td><span class="status-badge status-${t.bucket}">${ICONS[t.bucket]||'?'} ${t.bucket}</span></td>`;
    html+=`<td class="t-duration">${fmtDur(t.durationMs)}</td>`;
    html+=`</tr>`;
  }
  html+='</tbody></table>';
  main.innerHTML=html;
  bindTableEvents();
}

/* ── modal ── */
function showDetails(id){
  const t=DATA.tests.find(x=>x.id===id);
  if(!t) return;
  let html=`<button class="modal-close" id="modal-close">×</button>`;
  html+=`<h4>${esc(t.title)}</h4>`;
  html+=`<div class="detail-item"><strong>Suite:</strong> ${esc(t.suiteName)}</div>`;
  html+=`<div class="detail-item"><strong>Status:</strong> <span class="status-badge status-${t.bucket}">${ICONS[t.bucket]||'?'} ${t.bucket}</span> <span style="color:var(--muted)">(reported: ${esc(t.status)})</span></div>`;
  html+=`<div class="detail-item"><strong>Duration:</strong> ${fmtDur(t.durationMs)}</div>`;
  if(t.filePath) html+=`<div class="detail-item"><strong>File:</strong> <code>${esc(t.filePath)}</code></div>`;
  if(t.retryCount>0) html+=`<div class="detail-item"><strong>Retries:</strong> ${t.retryCount}</div>`;
  if(t.error){
    html+=`<div class="error-box"><h5>Error Details</h5><div>${esc(t.error.message)}</div>`;
    if(t.error.stack) html+=`<pre>${esc(t.error.stack)}</pre>`;
    html+='</div>';
  }
  $('#modal-box').innerHTML=html;
  $('#modal').classList.add('active');
  $('#modal-close').onclick=closeModal;
}
function closeModal(){$('#modal').classList.remove('active')}

/* ── event binding ── */
function bindTableEvents(){
  $$('tbody tr').forEach(el=>{el.onclick=()=>showDetails(el.dataset.id)});
  $$('thead th').forEach(th=>{
    th.onclick=()=>{
      const col=th.dataset.sort;
      if(sort.col===col){sort.dir=sort.dir==='asc'?'desc':'asc'}
      else{sort.col=col;sort.dir='asc'}
      render();
    };
  });
}

/* ── controls ── */
let debounceTimer;
$('#search').addEventListener('input',e=>{
  clearTimeout(debounceTimer);
  debounceTimer=setTimeout(()=>{query=e.target.value;render()},300);
});
$$('#status-filter .pill').forEach(btn=>{
  btn.onclick=()=>{
    $$('#status-filter .pill').forEach(b=>b.classList.remove('active'));
    btn.classList.add('active');
    activeStatus=btn.dataset.status;
    render();
  };
});
$('#modal').addEventListener('click',e=>{if(e.target===$('#modal')) closeModal()});
document.addEventListener('keydown',e=>{if(e.key==='Escape') closeModal()});

/* ── filter pill counts ── */
(function(){
  const g=DATA.global;
  const counts={all:g.total,passed:g.passed,failed:g.failed,skipped:g.skipped};
  $$('#status-filter .pill').forEach(btn=>{
    const c=counts[btn.dataset.status];
    if(c!==undefined) btn.innerHTML+=`<span class="cnt">${c}</span>`;
  });
})();

/* ── init ── */
renderStats();
renderSidebar();
render();

})();
</script>
"##
    }
}

impl Default for HtmlReporter {
    fn default() -> Self {
        Self::new()
    }
}
