pub const INDEX_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Video Recorder</title>
  <style>
    body { font-family: sans-serif; padding: 1rem; }
    .preview { width: 100%; max-width: 32rem; min-height: 12rem; margin-bottom: 1rem;
               border: 1px solid #ccc; border-radius: 4px; background: #fca5a5;
               display: flex; align-items: center; justify-content: center; }
    button { color: white; padding: 0.5rem 1rem; border: 0; border-radius: 4px; }
    #start { background: #3b82f6; }
    #stop { background: #ef4444; }
    video { width: 100%; max-width: 32rem; border: 1px solid #ccc; border-radius: 4px; }
  </style>
</head>
<body>
  <h1>Video Recorder</h1>
  <div id="preview" class="preview">No live source</div>
  <div style="margin-bottom: 1rem">
    <button id="start">Start Recording</button>
    <button id="stop" hidden>Stop Recording</button>
  </div>
  <div id="recorded" hidden>
    <h3>Recorded Video:</h3>
    <video id="playback" controls></video>
  </div>
  <script>
    const startBtn = document.getElementById("start");
    const stopBtn = document.getElementById("stop");
    let polling = null;

    function render(status) {
      const recording = status.phase !== "idle";
      startBtn.hidden = recording;
      stopBtn.hidden = !recording;
      stopBtn.disabled = status.phase === "stopping";
      document.getElementById("preview").textContent =
        status.preview.live_stream ? "Live: " + status.preview.live_stream : "No live source";
      const recorded = document.getElementById("recorded");
      const playback = document.getElementById("playback");
      if (status.artifact) {
        if (playback.getAttribute("src") !== status.artifact.url) {
          playback.src = status.artifact.url;
        }
        recorded.hidden = false;
      } else {
        playback.removeAttribute("src");
        recorded.hidden = true;
      }
      if (status.phase === "stopping" && !polling) {
        polling = setInterval(refresh, 250);
      } else if (status.phase !== "stopping" && polling) {
        clearInterval(polling);
        polling = null;
      }
    }

    async function refresh() {
      const res = await fetch("/recorder/status");
      render(await res.json());
    }

    startBtn.onclick = async () => {
      const res = await fetch("/recorder/start", { method: "POST" });
      const body = await res.json();
      if (!res.ok) {
        console.error("Error starting recording:", body.error);
        alert(body.message);
        return;
      }
      render(body);
    };

    stopBtn.onclick = async () => {
      const res = await fetch("/recorder/stop", { method: "POST" });
      render(await res.json());
    };

    window.addEventListener("pagehide", () => {
      navigator.sendBeacon("/recorder/teardown");
    });

    refresh();
  </script>
</body>
</html>
"#;
