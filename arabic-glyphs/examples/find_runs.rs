//! Print the Arabic runs found in each argument.

use arabic_glyphs::segmenter;

fn main() {
    env_logger::init();

    let samples: Vec<String> = match std::env::args().skip(1).collect::<Vec<_>>() {
        args if !args.is_empty() => args,
        _ => vec![
            "هذا النص  text العربي هنا 2022".to_string(),
            "see (عربي) and <b>نص</b>".to_string(),
        ],
    };

    for sample in &samples {
        println!("{}", sample);
        for run in segmenter::runs(sample) {
            println!("  [{:>4}, {:>4})  {}", run.start, run.end, run.as_str(sample));
        }
    }
}
