fn main() {
    tripdeck::run()
}
