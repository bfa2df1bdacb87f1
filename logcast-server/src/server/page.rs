use axum::response::Html;

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">

<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>WebSocket Log Consumer</title>
    <style>
        body {
            font-family: Arial, sans-serif;
        }
        #log-container {
            max-width: 800px;
            margin: 0 auto;
            padding: 20px;
            border: 1px solid #ccc;
            border-radius: 5px;
            background-color: #f9f9f9;
        }
        .log-message {
            margin-bottom: 10px;
            padding: 10px;
            background-color: #ffffff;
            border: 1px solid #ccc;
            border-radius: 5px;
        }
    </style>
</head>

<body>
    <div id="log-container"></div>

    <script>
        const logContainer = document.getElementById("log-container");
        const socket = new WebSocket("ws://" + window.location.host + "/ws");

        socket.onmessage = function (event) {
            if (!event.data) {
                console.error("Empty log message received");
                return;
            }
            const logElement = document.createElement("div");
            logElement.textContent = event.data;
            logElement.className = "log-message";
            logContainer.appendChild(logElement);
        };

        socket.onclose = function (event) {
            if (event.wasClean) {
                console.log(`Closed cleanly, code=${event.code}, reason=${event.reason}`);
            } else {
                console.error("Connection died");
            }
        };
    </script>
</body>

</html>
"#;

pub(crate) async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
