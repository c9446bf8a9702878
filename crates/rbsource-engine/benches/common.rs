// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_ruby_source(classes: usize) -> String {
    let mut source = String::from("# frozen_string_literal: true\n\n");

    for i in 0..classes {
        source.push_str(&format!(
            "class Widget{i} < Base\n  attr_reader :name, :size\n\n  def initialize(name, size = 1)\n    @name = name\n    @size = size # rubocop:disable Style/Foo\n  end\n\n  def grow(by)\n    if by > 0\n      @size += by\n    else\n      raise ArgumentError, 'negative'\n    end\n    items.each do |item|\n      puts item\n    end\n  end\nend\n\n"
        ));
    }

    source
}
