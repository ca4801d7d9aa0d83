use nimc::utils::prg::Prg;
use rand::RngCore;

#[test]
fn debug_next_u32() {
    let mut prg = Prg::new(&[7]);
    for i in 0..5 {
        eprintln!("call {}: {:x}", i, prg.next_u32());
    }
}
