fn main() -> anyhow::Result<()> {
    cygnet_driver::main()
}
