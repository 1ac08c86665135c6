fn main() -> anyhow::Result<()> {
    briefing::cli::main()
}
