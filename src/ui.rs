use crate::dashboard::Dashboard;

pub fn render_index(dashboard: &Dashboard) -> String {
    let (mood, mood_note) = match &dashboard.mood {
        Some(card) => (format!("{} {}", card.emoji, card.label), card.note.clone().unwrap_or_default()),
        None => ("Not logged".to_string(), String::new()),
    };
    let (sleep, sleep_delta) = match &dashboard.sleep {
        Some(card) => (card.label.clone(), format!("{:+} min vs average", card.vs_average)),
        None => ("Not logged".to_string(), String::new()),
    };
    let weekly = &dashboard.weekly;

    INDEX_HTML
        .replace("{{DATE}}", &dashboard.date.format("%A, %B %-d").to_string())
        .replace("{{WATER}}", &dashboard.water.total_ml.to_string())
        .replace("{{WATER_GOAL}}", &dashboard.water.goal_ml.to_string())
        .replace("{{WATER_PERCENT}}", &dashboard.water.percent.min(100).to_string())
        .replace("{{SLEEP}}", &sleep)
        .replace("{{SLEEP_DELTA}}", &sleep_delta)
        .replace("{{CALORIES}}", &dashboard.calories.total.to_string())
        .replace("{{CALORIE_GOAL}}", &dashboard.calories.goal.to_string())
        .replace("{{CALORIE_PERCENT}}", &dashboard.calories.percent.min(100).to_string())
        .replace("{{WEEK_SLEEP_PERCENT}}", &weekly.sleep_percent.min(100).to_string())
        .replace("{{WEEK_WATER_PERCENT}}", &weekly.water_percent.min(100).to_string())
        // user text goes in last so it is never scanned for placeholders
        .replace("{{MOOD}}", &escape(&mood))
        .replace("{{MOOD_NOTE}}", &escape(&mood_note))
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Wellness Tracker</title>
  <style>
    :root {
      --bg-1: #eef6f1;
      --bg-2: #cde8dc;
      --ink: #22302b;
      --accent: #3f9b7a;
      --accent-2: #2f4858;
      --card: rgba(255, 255, 255, 0.9);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.16);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #f4faf7 100%);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(900px, 100%);
      background: var(--card);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 28px;
    }

    h1 {
      font-family: "Georgia", serif;
      margin: 0;
    }

    .subtitle {
      margin: 0;
      color: #5f6b66;
    }

    .panel {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(190px, 1fr));
      gap: 16px;
    }

    .stat {
      background: white;
      border-radius: 18px;
      padding: 18px;
      border: 1px solid rgba(47, 72, 88, 0.08);
      display: grid;
      gap: 8px;
    }

    .stat .label {
      font-size: 0.85rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: #7d8a84;
    }

    .stat .value {
      font-size: 1.5rem;
      font-weight: 600;
      color: var(--accent-2);
    }

    .stat .detail {
      font-size: 0.9rem;
      color: #6b7570;
    }

    .bar {
      height: 8px;
      border-radius: 999px;
      background: rgba(47, 72, 88, 0.1);
      overflow: hidden;
    }

    .bar span {
      display: block;
      height: 100%;
      background: var(--accent);
    }

    .status {
      font-size: 0.95rem;
      color: #6b7570;
      min-height: 1.2em;
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Wellness Tracker</h1>
      <p class="subtitle" id="date">{{DATE}}</p>
    </header>

    <section class="panel">
      <div class="stat">
        <span class="label">Mood</span>
        <span class="value" id="mood">{{MOOD}}</span>
        <span class="detail" id="mood-note">{{MOOD_NOTE}}</span>
      </div>
      <div class="stat">
        <span class="label">Water</span>
        <span class="value"><span id="water">{{WATER}}</span> / {{WATER_GOAL}} ml</span>
        <div class="bar"><span id="water-bar" style="width: {{WATER_PERCENT}}%"></span></div>
      </div>
      <div class="stat">
        <span class="label">Sleep</span>
        <span class="value" id="sleep">{{SLEEP}}</span>
        <span class="detail" id="sleep-delta">{{SLEEP_DELTA}}</span>
      </div>
      <div class="stat">
        <span class="label">Calories</span>
        <span class="value"><span id="calories">{{CALORIES}}</span> / {{CALORIE_GOAL}} kcal</span>
        <div class="bar"><span id="calorie-bar" style="width: {{CALORIE_PERCENT}}%"></span></div>
      </div>
    </section>

    <section class="panel">
      <div class="stat">
        <span class="label">Weekly sleep goal</span>
        <div class="bar"><span id="week-sleep" style="width: {{WEEK_SLEEP_PERCENT}}%"></span></div>
      </div>
      <div class="stat">
        <span class="label">Weekly water goal</span>
        <div class="bar"><span id="week-water" style="width: {{WEEK_WATER_PERCENT}}%"></span></div>
      </div>
    </section>

    <div class="status" id="status"></div>
  </main>

  <script>
    const statusEl = document.getElementById('status');
    const width = (value) => `${Math.min(value, 100)}%`;

    const refresh = async () => {
      try {
        const res = await fetch('/api/dashboard');
        if (!res.ok) {
          throw new Error(await res.text());
        }
        const data = await res.json();
        document.getElementById('water').textContent = data.water.total_ml;
        document.getElementById('water-bar').style.width = width(data.water.percent);
        document.getElementById('calories').textContent = data.calories.total;
        document.getElementById('calorie-bar').style.width = width(data.calories.percent);
        document.getElementById('week-sleep').style.width = width(data.weekly.sleep_percent);
        document.getElementById('week-water').style.width = width(data.weekly.water_percent);
        statusEl.textContent = '';
      } catch (err) {
        statusEl.textContent = `Could not refresh: ${err.message}`;
      }
    };

    setInterval(refresh, 60000);
  </script>
</body>
</html>
"#;
