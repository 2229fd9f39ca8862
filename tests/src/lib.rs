#[cfg(test)]
mod tests {
    use anyhow::anyhow;
    use sized_gen::{
        call_args, generator, sized, Arguments, Coroutine, Error, IterCoroutine, ResumeError,
        Signature, SizeSpec, SizedFn, SizedStreamExt, State, Value, WithSize,
    };
    use std::cell::Cell;

    /// Renders a "done/total" counter the way a progress bar would, asking the
    /// iterator for its length before consuming it.
    fn progress<I: ExactSizeIterator>(iter: I) -> (usize, String) {
        let total = iter.len();
        let mut done = 0;
        for _ in iter {
            done += 1;
        }
        (done, format!("{done}/{total}"))
    }

    fn make_target(
        args: &Arguments,
    ) -> impl Coroutine<Yield = i64, Input = (), Error = anyhow::Error> {
        let n = args["n"].as_int().unwrap_or_default();
        generator(move |co| async move {
            for i in 0..n {
                co.yield_(i).await?;
            }
            Ok::<(), anyhow::Error>(())
        })
    }

    fn make() -> SizedFn<
        impl Fn(&Arguments) -> Box<dyn Coroutine<Yield = i64, Input = (), Error = anyhow::Error>>,
    > {
        sized(SizeSpec::derived(|args: &Arguments| args["n"].clone())).attach(
            Signature::new("make").param("n"),
            |args: &Arguments| {
                Box::new(make_target(args))
                    as Box<dyn Coroutine<Yield = i64, Input = (), Error = anyhow::Error>>
            },
        )
    }

    #[test]
    fn make_twenty_five() {
        let mut gen = make().call(call_args![25]).unwrap();
        assert_eq!(gen.remaining(), 25);

        let items = gen.by_ref().collect::<Result<Vec<_>, _>>().unwrap();
        assert_eq!(items, (0..25).collect::<Vec<_>>());

        assert_eq!(gen.advance(()).unwrap(), None);
        let err = gen.inject_failure(anyhow!("RuntimeError")).unwrap_err();
        assert_eq!(err.to_string(), "RuntimeError");
    }

    #[test]
    fn remaining_after_every_step() {
        for n in 0..=12 {
            for k in 0..=n {
                let mut gen = make().call(call_args![n = n]).unwrap();
                for _ in 0..k {
                    assert!(gen.advance(()).unwrap().is_some());
                }
                assert_eq!(gen.remaining(), n - k);
                if k == n {
                    assert_eq!(gen.advance(()).unwrap(), None);
                }
            }
        }
    }

    #[test]
    fn length_queryable_size_matches_production() {
        let source = vec![1, 2, 3];
        let replay = sized(source.clone()).attach(
            Signature::new("replay").param("size_in"),
            |args: &Arguments| {
                let items = args["size_in"].as_list().unwrap_or_default().to_vec();
                IterCoroutine::<_, anyhow::Error>::new(items.into_iter())
            },
        );

        let mut gen = replay.call(call_args![source.clone()]).unwrap();
        let items = gen.by_ref().collect::<Result<Vec<_>, _>>().unwrap();
        assert_eq!(items, Value::from(source).as_list().unwrap_or_default());
        assert_eq!(gen.remaining(), 0);
        assert!(gen.next().is_none());
    }

    #[test]
    fn positional_index_and_name_agree() {
        let by_index = sized(SizeSpec::derived(|args: &Arguments| args["0"].clone())).attach(
            Signature::new("make").param("n"),
            |args: &Arguments| make_target(args),
        );

        for call in [call_args![20], call_args![n = 20]] {
            assert_eq!(make().call(call.clone()).unwrap().remaining(), 20);
            assert_eq!(by_index.call(call).unwrap().remaining(), 20);
        }
    }

    #[test]
    fn missing_argument_has_no_side_effects() {
        let entered = Cell::new(0);
        let make = sized(SizeSpec::derived(|args: &Arguments| args["n"].clone())).attach(
            Signature::new("make").param("n").param_with_default("label", "numbers"),
            |args: &Arguments| {
                entered.set(entered.get() + 1);
                make_target(args)
            },
        );

        let err = make.call(call_args![label = "x"]).unwrap_err();
        assert_eq!(err.to_string(), "make() missing a required argument: 'n'");
        assert_eq!(entered.get(), 0);

        make.call(call_args![3]).unwrap();
        assert_eq!(entered.get(), 1);
    }

    #[test]
    fn injected_failure_reraised_or_recovered() {
        let mut plain = make().call(call_args![5]).unwrap();
        plain.advance(()).unwrap();
        let err = plain.inject_failure(anyhow!("typed error")).unwrap_err();
        assert!(matches!(&err, ResumeError::Raised(e) if e.to_string() == "typed error"));

        let resilient = sized(4).attach(Signature::new("resilient"), |_: &Arguments| {
            generator(|co| async move {
                let mut i = 0;
                while i < 4 {
                    match co.yield_(i).await {
                        Ok(()) => i += 1,
                        Err(_) => i = 3,
                    }
                }
                Ok::<(), anyhow::Error>(())
            })
        });
        let mut gen = resilient.call(call_args![]).unwrap();
        assert_eq!(gen.advance(()).unwrap(), Some(0));
        assert_eq!(gen.inject_failure(anyhow!("skip")).unwrap(), Some(3));
        assert_eq!(gen.remaining(), 3);
    }

    #[test]
    fn fixed_size_smaller_than_production() {
        let make = sized(10).attach(Signature::new("make").param("n"), make_target);
        let mut gen = make.call(call_args![1000]).unwrap();

        assert_eq!(gen.by_ref().count(), 10);
        assert_eq!(gen.remaining(), 0);
        assert_eq!(gen.advance(()).unwrap(), None);
        assert_eq!(gen.state(), State::Exhausted);
    }

    #[test]
    fn production_shorter_than_size() {
        // whichever finishes first governs; the pull that saw the end is counted
        let make = sized(10).attach(Signature::new("make").param("n"), make_target);
        let mut gen = make.call(call_args![4]).unwrap();

        assert_eq!(gen.by_ref().count(), 4);
        assert_eq!(gen.state(), State::Exhausted);
        assert_eq!(gen.remaining(), 5);
        assert_eq!(gen.advance(()).unwrap(), None);
        assert_eq!(gen.remaining(), 5);
    }

    #[test]
    fn closing_stops_everything() {
        let mut gen = make().call(call_args![5]).unwrap();
        gen.advance(()).unwrap();
        gen.close();
        assert!(matches!(gen.advance(()), Err(ResumeError::Closed)));
        assert!(matches!(
            gen.inject_failure(anyhow!("late")),
            Err(ResumeError::Closed)
        ));
    }

    #[test]
    fn wrapping_rejects_bad_inputs() {
        assert!(matches!(
            (0..5).with_size(Value::Float(1.0)),
            Err(Error::InvalidSize { type_name: "float", .. })
        ));

        let mut spent = IterCoroutine::<_, anyhow::Error>::new(0..0);
        assert!(spent.resume(()).unwrap().is_none());
        assert!(matches!(
            sized_gen::SizedGenerator::new(spent, 3),
            Err(Error::NotASequence)
        ));
    }

    #[test]
    fn decorated_bad_size_is_an_invalid_specification() {
        let make = sized(Value::Float(1.5)).attach(Signature::new("make").param("n"), make_target);
        assert!(matches!(
            make.call(call_args![3]),
            Err(Error::InvalidSizeSpecification { type_name: "float", .. })
        ));
    }

    #[test]
    fn huge_size_is_not_wrapped_negative() {
        let make = sized(u64::MAX).attach(Signature::new("make").param("n"), make_target);
        let mut gen = make.call(call_args![u64::MAX]).unwrap();
        assert_eq!(gen.state(), State::Active);
        assert_eq!(gen.remaining(), i64::MAX);
        assert_eq!(gen.advance(()).unwrap(), Some(0));
    }

    #[test]
    fn progress_reporting_sees_the_length() {
        let gen = (0..128).with_size((0..128).collect::<Vec<_>>()).unwrap();
        assert_eq!(progress(gen), (128, "128/128".to_string()));

        let gen = make().call(call_args![n = 7]).unwrap();
        assert_eq!(progress(gen), (7, "7/7".to_string()));
    }

    #[tokio::test]
    async fn progress_reporting_over_streams() {
        use futures::stream::{Stream, StreamExt};

        let mut stream = futures::stream::iter(0..64).with_size(64).unwrap();
        let mut reports = Vec::new();
        while let Some(_item) = stream.next().await {
            reports.push(stream.size_hint().0);
        }
        assert_eq!(reports.len(), 64);
        assert_eq!(reports.first(), Some(&63));
        assert_eq!(reports.last(), Some(&0));
    }
}
