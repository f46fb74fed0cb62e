use skipmap::SkipMap;

fn main() {
    let mut val = SkipMap::with_seed(42);
    for i in (1..100).filter(|i| i % 2 == 1) {
        val.try_emplace(i, i).unwrap();
    }
    assert_eq!(val.len(), 50);
    assert!(!val.try_emplace(1, 100).unwrap());

    assert_eq!(val.lower_bound(&2).get(), Some((&3, &3)));
    assert_eq!(val.upper_bound(&3).get(), Some((&5, &5)));
    assert!(val.upper_bound(&99) == val.end());

    if let Some((_, v)) = val.try_get(&7) {
        *v *= 10;
    }
    assert_eq!(val.get(&7), Some(&70));

    let window: Vec<_> = val.range(&10, &20).map(|(k, v)| (*k, *v)).collect();
    println!("levels = {}, [10, 20) = {:?}", val.level(), window);
}
