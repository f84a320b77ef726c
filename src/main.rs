use amphipod::{burrow::Solution, Args, Parser, RunQuestions};

fn main() {
    Solution::run(&Args::parse());
}
