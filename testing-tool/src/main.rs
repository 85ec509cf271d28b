use anyhow::{bail, Context, Result};
use colored::*;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::io::{self, Write};
use std::time::{SystemTime, UNIX_EPOCH};

#[tokio::main]
async fn main() -> Result<()> {
    println!("{}", "🅿️ Parking Allocation Smoke Tool".bright_blue().bold());
    println!("{}", "=================================".bright_blue());
    println!();

    let base_url = prompt("URL base (ej: http://localhost:3000): ")?;
    let base_url = if base_url.is_empty() {
        "http://localhost:3000".to_string()
    } else {
        base_url.trim_end_matches('/').to_string()
    };
    let api = Api {
        http: Client::new(),
        base_url,
    };

    loop {
        println!();
        println!("{}", "📋 MENÚ PRINCIPAL".bright_green().bold());
        println!("{}", "==================".bright_green());
        println!("1. 🚗 Escenario de conflicto (A/C1 vs B/C2 en S1)");
        println!("2. 🔄 Reconciliar disponibilidad");
        println!("3. 🚪 Salir");

        match prompt("Selecciona una opción (1-3): ")?.as_str() {
            "1" => {
                if let Err(e) = run_conflict_scenario(&api).await {
                    println!("{} {:#}", "❌ Escenario fallido:".bright_red().bold(), e);
                }
            }
            "2" => match api.post("/api/parking-spaces/reconcile", json!({})).await {
                Ok((_, body)) => println!("{}", serde_json::to_string_pretty(&body["data"])?),
                Err(e) => println!("{} {:#}", "❌".bright_red(), e),
            },
            "3" => {
                println!("{}", "👋 ¡Hasta luego!".bright_green());
                break;
            }
            _ => println!("{}", "❌ Opción inválida. Intenta de nuevo.".bright_red()),
        }
    }

    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label.bright_yellow());
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

struct Api {
    http: Client,
    base_url: String,
}

impl Api {
    async fn get(&self, path: &str) -> Result<(StatusCode, Value)> {
        let response = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .with_context(|| format!("GET {}", path))?;
        read(response).await
    }

    async fn post(&self, path: &str, body: Value) -> Result<(StatusCode, Value)> {
        let response = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .json(&body)
            .send()
            .await
            .with_context(|| format!("POST {}", path))?;
        read(response).await
    }

    /// POST que debe devolver 201; devuelve el id creado
    async fn create(&self, path: &str, body: Value) -> Result<i64> {
        let (status, body) = self.post(path, body).await?;
        if status != StatusCode::CREATED {
            bail!("POST {} -> {}: {}", path, status, body);
        }
        body["data"]["id"]
            .as_i64()
            .with_context(|| format!("POST {} sin id en la respuesta", path))
    }

    async fn space_available(&self, space_id: i64) -> Result<bool> {
        let (_, body) = self.get(&format!("/api/parking-spaces/{}", space_id)).await?;
        body["is_available"]
            .as_bool()
            .context("respuesta sin is_available")
    }
}

async fn read(response: reqwest::Response) -> Result<(StatusCode, Value)> {
    let status = response.status();
    let text = response.text().await?;
    let body = if text.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&text).unwrap_or(Value::String(text))
    };
    Ok((status, body))
}

fn check(label: &str, ok: bool) -> Result<()> {
    if ok {
        println!("   {} {}", "✅".green(), label);
        Ok(())
    } else {
        println!("   {} {}", "❌".red(), label);
        bail!("{}", label)
    }
}

async fn run_conflict_scenario(api: &Api) -> Result<()> {
    let run = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() % 100_000;
    println!();
    println!("{}", format!("🧪 Ejecución {}", run).bright_cyan().bold());

    let client_a = api
        .create(
            "/api/clients",
            json!({ "first_name": "Ana", "last_name": "Smoke", "document_number": format!("A{}", run), "email": format!("a{}@smoke.test", run) }),
        )
        .await?;
    let client_b = api
        .create(
            "/api/clients",
            json!({ "first_name": "Bruno", "last_name": "Smoke", "document_number": format!("B{}", run), "email": format!("b{}@smoke.test", run) }),
        )
        .await?;
    let car_1 = api
        .create(
            "/api/cars",
            json!({ "license_plate": format!("C1-{}", run), "brand": "Seat", "model": "Ibiza", "year": 2020, "client_id": client_a }),
        )
        .await?;
    let car_2 = api
        .create(
            "/api/cars",
            json!({ "license_plate": format!("C2-{}", run), "brand": "Kia", "model": "Rio", "year": 2021, "client_id": client_b }),
        )
        .await?;
    let space_1 = api
        .create(
            "/api/parking-spaces",
            json!({ "space_number": format!("S{}", run), "zone": "SMOKE" }),
        )
        .await?;
    println!("   clientes {}/{}, coches {}/{}, espacio {}", client_a, client_b, car_1, car_2, space_1);

    let first = api
        .create(
            "/api/parking-assignments",
            json!({ "client_id": client_a, "car_id": car_1, "parking_space_id": space_1 }),
        )
        .await?;
    check("A/C1 obtiene S1", true)?;
    check("S1 deja de estar disponible", !api.space_available(space_1).await?)?;

    let (status, body) = api
        .post(
            "/api/parking-assignments",
            json!({ "client_id": client_b, "car_id": car_2, "parking_space_id": space_1 }),
        )
        .await?;
    check(
        "B/C2 es rechazado con SPACE_CONFLICT",
        status == StatusCode::CONFLICT && body["code"] == "SPACE_CONFLICT",
    )?;

    let (status, _) = api
        .post(
            &format!("/api/parking-assignments/{}/revoke", first),
            json!({ "reason": "smoke test" }),
        )
        .await?;
    check("Revocación de la primera asignación", status == StatusCode::OK)?;

    api.create(
        "/api/parking-assignments",
        json!({ "client_id": client_b, "car_id": car_2, "parking_space_id": space_1 }),
    )
    .await?;
    check("B/C2 obtiene S1 al reintentar", true)?;
    check("S1 sigue ocupado", !api.space_available(space_1).await?)?;

    let (_, prior) = api.get(&format!("/api/parking-assignments/{}", first)).await?;
    check("La primera asignación queda Cancelled", prior["status"] == "Cancelled")?;

    println!("{}", "🎉 Escenario completado".bright_green().bold());
    Ok(())
}
