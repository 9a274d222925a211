fn main() -> Result<(), Box<dyn std::error::Error>> {
    chatbot_ai::cli::main()
}
