use mirador_chat::{ConversationGate, GeminiAssistant, DEFAULT_ASSISTANT_TIMEOUT};
use std::io::Write;
use std::sync::Arc;

const EXIT_WORDS: &[&str] = &["salir", "adios", "exit", "quit"];

pub enum ReplError {
    Assistant(String),
    Io(String),
}

/// Terminal SafeGuide session: one blocking prompt/response loop, exactly
/// the single-event-at-a-time model the dashboard session uses.
pub async fn run(api_key: String) -> Result<(), ReplError> {
    let assistant = GeminiAssistant::new(api_key, DEFAULT_ASSISTANT_TIMEOUT)
        .map_err(|e| ReplError::Assistant(e.to_string()))?;
    let mut gate = ConversationGate::new(Arc::new(assistant));

    println!("SafeGuide - Asistente de Turismo Seguro en Ecuador");
    println!("Consulta sobre provincias, ciudades o lugares para visitar en Ecuador.");
    println!("Escribe 'salir', 'adios', 'exit' o 'quit' para finalizar.");
    println!();

    let stdin = std::io::stdin();
    loop {
        print!("Tú: ");
        std::io::stdout()
            .flush()
            .map_err(|e| ReplError::Io(e.to_string()))?;

        let mut line = String::new();
        let read = stdin
            .read_line(&mut line)
            .map_err(|e| ReplError::Io(e.to_string()))?;
        if read == 0 {
            break;
        }
        let input = line.trim();
        if EXIT_WORDS.contains(&input.to_lowercase().as_str()) {
            println!("SafeGuide: Gracias por usar SafeGuide. ¡Buen viaje!");
            break;
        }

        let reply = gate.respond(input).await;
        println!("SafeGuide: {reply}");
        println!();
    }
    Ok(())
}
